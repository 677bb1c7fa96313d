mod support;

use std::path::Path;
use std::sync::Arc;

use parkvoice::analysis::audio::CANONICAL_SAMPLE_RATE;
use parkvoice::config::AppConfig;
use parkvoice::ml::ClassifierArtifact;
use parkvoice::{
    ClassifyError, ConfigurationError, Diagnosis, FEATURE_NAMES, InputError, VoiceClassifier,
};
use serde_json::json;
use support::env::ConfigHomeGuard;
use support::wav::{padded_empty_wav, sustained_vowel, wav_bytes};
use tempfile::tempdir;

/// Artifact whose logistic regression ignores the features and returns `p`.
fn constant_artifact_json(features: &[&str], p: f64) -> String {
    let n = features.len();
    json!({
        "model_version": 2,
        "selected_features": features,
        "scaler": { "mean": vec![0.0; n], "scale": vec![1.0; n] },
        "classifier": {
            "kind": "logistic_regression",
            "coef": vec![0.0; n],
            "intercept": (p / (1.0 - p)).ln(),
        }
    })
    .to_string()
}

fn classifier_with(features: &[&str], p: f64, config: &AppConfig) -> VoiceClassifier {
    let artifact = ClassifierArtifact::from_json_str(&constant_artifact_json(features, p))
        .expect("artifact");
    VoiceClassifier::new(Arc::new(artifact), config)
}

fn vowel_wav(seconds: f32) -> Vec<u8> {
    wav_bytes(
        CANONICAL_SAMPLE_RATE,
        &sustained_vowel(seconds, CANONICAL_SAMPLE_RATE),
    )
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).expect("read staging dir").next().is_none()
}

#[test]
fn confident_parkinson_verdict() {
    let classifier = classifier_with(&FEATURE_NAMES, 0.9, &AppConfig::default());
    let result = classifier
        .classify(&vowel_wav(3.5), "sample.WAV")
        .expect("classify");
    assert_eq!(result.diagnosis, Diagnosis::Parkinson);
    assert!((result.confidence - 0.9).abs() < 1e-9);
    assert!(result.warning.is_none());
    assert_eq!(result.features_used.len(), FEATURE_NAMES.len());

    let response = serde_json::to_value(result.to_response()).unwrap();
    assert_eq!(response["disease"], "Parkinson");
    assert_eq!(response["confidence"], 0.9);
    assert_eq!(response["message"], "Potential Parkinson's detected");
    assert_eq!(response["details"]["healthy_prob"], 0.1);
    assert!(response.get("warning").is_none());
}

#[test]
fn borderline_probability_is_healthy_with_warning() {
    let classifier = classifier_with(&["Fo", "HNR", "PPE"], 0.6, &AppConfig::default());
    let result = classifier
        .classify(&vowel_wav(3.2), "sample.wav")
        .expect("classify");
    assert_eq!(result.diagnosis, Diagnosis::Healthy);
    assert!((result.confidence - 0.4).abs() < 1e-9);
    assert!(result.warning.is_some());
    let sum = result.probabilities.healthy + result.probabilities.parkinson;
    assert!((sum - 1.0).abs() < 1e-12);
    assert_eq!(result.features_used, vec!["Fo", "HNR", "PPE"]);
}

#[test]
fn short_recording_is_rejected_after_decoding() {
    let classifier = classifier_with(&["Fo"], 0.5, &AppConfig::default());
    let err = classifier
        .classify(&vowel_wav(2.0), "sample.wav")
        .unwrap_err();
    assert!(matches!(
        err,
        ClassifyError::Input(InputError::RecordingTooShort { .. })
    ));
    assert_eq!(err.to_string(), "Recording too short (min 3 seconds).");
    assert_eq!(err.status_code(), 400);
}

#[test]
fn zero_sample_wav_is_too_short_not_undecodable() {
    let classifier = classifier_with(&["Fo"], 0.5, &AppConfig::default());
    let bytes = padded_empty_wav(CANONICAL_SAMPLE_RATE, 1100);
    assert!(bytes.len() > 1024);
    let err = classifier.classify(&bytes, "silence.wav").unwrap_err();
    assert!(matches!(
        err,
        ClassifyError::Input(InputError::RecordingTooShort { .. })
    ));
    assert_eq!(err.to_string(), "Recording too short (min 3 seconds).");
}

#[test]
fn resampled_input_is_measured_at_canonical_rate() {
    let classifier = classifier_with(&["Fo"], 0.5, &AppConfig::default());
    let bytes = wav_bytes(44_100, &sustained_vowel(3.1, 44_100));
    assert!(classifier.classify(&bytes, "hi-rate.wav").is_ok());
}

#[test]
fn unknown_artifact_feature_is_a_configuration_error() {
    let classifier = classifier_with(&["Fo", "MDVP:RAP", "D2"], 0.5, &AppConfig::default());
    let err = classifier
        .classify(&vowel_wav(3.1), "sample.wav")
        .unwrap_err();
    match &err {
        ClassifyError::Configuration(ConfigurationError::MissingFeatures(missing)) => {
            assert_eq!(missing, &vec!["MDVP:RAP".to_string(), "D2".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status_code(), 500);
    assert!(!err.is_user_error());
}

#[test]
fn staging_files_are_removed_on_every_path() {
    let staging = tempdir().unwrap();
    let config = AppConfig {
        staging_dir: Some(staging.path().to_path_buf()),
        ..AppConfig::default()
    };
    let classifier = classifier_with(&["Fo"], 0.8, &config);

    classifier
        .classify(&vowel_wav(3.1), "ok.wav")
        .expect("classify");
    assert!(is_empty_dir(staging.path()));

    let err = classifier.classify(&vowel_wav(1.0), "short.wav").unwrap_err();
    assert!(err.is_user_error());
    assert!(is_empty_dir(staging.path()));

    let err = classifier.classify(&[9_u8; 4096], "junk.wav").unwrap_err();
    assert!(matches!(err, ClassifyError::Input(InputError::Undecodable(_))));
    assert!(is_empty_dir(staging.path()));
}

#[test]
fn non_wav_uploads_go_through_the_transcoder() {
    let classifier = classifier_with(&["Fo", "Jitter"], 0.3, &AppConfig::default());
    // Symphonia probes the content, so WAV bytes under a FLAC name still decode.
    let result = classifier
        .classify(&vowel_wav(3.1), "voice.flac")
        .expect("classify");
    assert_eq!(result.diagnosis, Diagnosis::Healthy);

    let err = classifier.classify(&[0x11; 8192], "voice.m4a").unwrap_err();
    assert!(matches!(err, ClassifyError::Input(InputError::Conversion(_))));
}

#[test]
fn concurrent_classification_is_consistent() {
    let classifier = classifier_with(&FEATURE_NAMES, 0.75, &AppConfig::default());
    let bytes = vowel_wav(3.1);
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..3)
            .map(|i| {
                let classifier = &classifier;
                let bytes = &bytes;
                scope.spawn(move || classifier.classify(bytes, &format!("take{i}.wav")))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked").expect("classify"))
            .collect()
    });
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(results[0].diagnosis, Diagnosis::Parkinson);
}

#[test]
fn from_config_loads_default_artifact_location() {
    let home = tempdir().unwrap();
    let _guard = ConfigHomeGuard::set(home.path().to_path_buf());
    let root = home.path().join(".parkvoice");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(
        root.join("pd_model.json"),
        constant_artifact_json(&["Fo", "spread1"], 0.5),
    )
    .unwrap();

    let classifier = VoiceClassifier::from_config(&AppConfig::default()).expect("from_config");
    let health = serde_json::to_value(classifier.health()).unwrap();
    assert_eq!(health, json!({ "status": "ok", "model_features": ["Fo", "spread1"] }));
    assert_eq!(classifier.artifact().model_version(), 2);
}

#[test]
fn from_config_reports_missing_artifact() {
    let dir = tempdir().unwrap();
    let config = AppConfig {
        artifact_path: Some(dir.path().join("nope.json")),
        ..AppConfig::default()
    };
    assert!(VoiceClassifier::from_config(&config).is_err());
}
