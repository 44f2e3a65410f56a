use std::sync::Arc;

use tempfile::tempdir;
use verity::analysis::analyzer::NewsAnalyzer;
use verity::artifact::TrainedArtifact;
use verity::corpus::Label;
use verity::error::VerityError;
use verity::predictor::{Predictor, classify};
use verity::trainer::Trainer;
use verity::vectorizer::{TfIdfVectorizer, VectorizerConfig};

const FILLER: &[&str] = &[
    "today", "morning", "statement", "country", "people", "week", "city", "public", "office",
    "report", "story", "source", "video", "photo", "local", "government",
];

/// 100 fake articles leaning on "shocking" and 100 real ones on "reported".
fn scenario_corpus() -> (Vec<String>, Vec<String>) {
    let article = |marker: &str, i: usize| {
        let a = FILLER[i % FILLER.len()];
        let b = FILLER[(i * 7 + 3) % FILLER.len()];
        format!("{marker} {a} {marker} {b} {marker} item{i}")
    };
    let fake = (0..100).map(|i| article("shocking", i)).collect();
    let real = (0..100).map(|i| article("reported", i)).collect();
    (fake, real)
}

fn trained_predictor() -> Predictor {
    let (fake, real) = scenario_corpus();
    let report = Trainer::default().train(&fake, &real).unwrap();
    Predictor::new(report.artifact).unwrap()
}

const SAMPLES: [&str; 5] = [
    "shocking shocking shocking",
    "Officials reported the figures this morning.",
    "A shocking video from the city",
    "zebra quantum xylophone",
    "the and of reported shocking",
];

#[test]
fn test_scenario_shocking_is_fake() {
    let predictor = trained_predictor();

    let prediction = predictor.classify("shocking shocking shocking").unwrap();
    assert_eq!(prediction.label, Label::Fake);
    assert!(prediction.confidence > 0.5);
    assert_eq!(prediction.word_count, 3);

    let prediction = predictor.classify("it was reported").unwrap();
    assert_eq!(prediction.label, Label::Real);
}

#[test]
fn test_scenario_held_out_accuracy() {
    let (fake, real) = scenario_corpus();
    let report = Trainer::default().train(&fake, &real).unwrap();
    assert_eq!(report.train_size, 160);
    assert_eq!(report.test_size, 40);
    assert_eq!(report.accuracy, Some(1.0));
    assert!(report.artifact.vocabulary().contains("shocking"));
    assert!(report.artifact.vocabulary().contains("reported"));
}

#[test]
fn test_classify_is_deterministic() {
    let predictor = trained_predictor();
    for text in SAMPLES {
        let first = predictor.classify(text).unwrap();
        let second = predictor.classify(text).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_confidence_bound() {
    let predictor = trained_predictor();
    let texts = SAMPLES
        .iter()
        .copied()
        .chain(["item3", "today today", "reported shocking", "1234567890"]);
    for text in texts {
        let confidence = predictor.classify(text).unwrap().confidence;
        assert!(
            (0.5..=1.0).contains(&confidence),
            "confidence {confidence} out of range for {text:?}"
        );
    }
}

#[test]
fn test_empty_input_rejected() {
    let predictor = trained_predictor();
    assert!(matches!(
        predictor.classify(""),
        Err(VerityError::EmptyInput(_))
    ));
    assert!(matches!(
        predictor.classify("   "),
        Err(VerityError::EmptyInput(_))
    ));
}

#[test]
fn test_artifact_round_trip() {
    let (fake, real) = scenario_corpus();
    let artifact = Trainer::default().train(&fake, &real).unwrap().artifact;
    let before = Predictor::new(artifact.clone()).unwrap();

    let dir = tempdir().unwrap();
    for name in ["model.json", "model.bin"] {
        let path = dir.path().join(name);
        artifact.save(&path).unwrap();

        let loaded = TrainedArtifact::load(&path).unwrap();
        assert_eq!(loaded, artifact);

        let after = Predictor::load(&path).unwrap();
        for text in SAMPLES {
            let expected = before.classify(text).unwrap();
            let actual = after.classify(text).unwrap();
            assert_eq!(actual.label, expected.label);
            assert_eq!(actual.word_count, expected.word_count);
            assert!((actual.confidence - expected.confidence).abs() < 1e-9);
        }
    }
}

#[test]
fn test_free_classify_matches_handle() {
    let (fake, real) = scenario_corpus();
    let artifact = Trainer::default().train(&fake, &real).unwrap().artifact;
    let predictor = Predictor::new(artifact.clone()).unwrap();
    for text in SAMPLES {
        assert_eq!(
            classify(text, &artifact).unwrap(),
            predictor.classify(text).unwrap()
        );
    }
}

#[test]
fn test_vocabulary_stability() {
    let (fake, real) = scenario_corpus();
    let documents: Vec<&str> = fake.iter().chain(&real).map(String::as_str).collect();

    let mut first = TfIdfVectorizer::default();
    let mut second = TfIdfVectorizer::default();
    let a = first.fit(&documents).unwrap().clone();
    let b = second.fit(&documents).unwrap().clone();

    assert_eq!(a.terms(), b.terms());
    for (x, y) in a.idf_weights().iter().zip(b.idf_weights()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn test_stop_words_and_frequent_terms_excluded() {
    let documents = [
        "Of the news",
        "News: they were there",
        "news is news",
        "And the news again",
    ];
    let mut vectorizer =
        TfIdfVectorizer::new(Arc::new(NewsAnalyzer::default()), VectorizerConfig::default());
    assert!(vectorizer.fit(&documents).unwrap().is_empty());
    assert!(vectorizer.transform("news of the day, again").unwrap().is_zero());
}

#[test]
fn test_out_of_vocabulary_robustness() {
    let predictor = trained_predictor();
    let prediction = predictor.classify("zebra quantum xylophone").unwrap();
    assert!((0.5..=1.0).contains(&prediction.confidence));

    let (fake, real) = scenario_corpus();
    let mut vectorizer = TfIdfVectorizer::default();
    vectorizer.fit(&[fake, real].concat()).unwrap();
    assert!(vectorizer.transform("zebra quantum xylophone").unwrap().is_zero());
}

#[test]
fn test_predictor_shared_across_threads() {
    let predictor = Arc::new(trained_predictor());
    let expected: Vec<_> = SAMPLES
        .iter()
        .map(|text| predictor.classify(text).unwrap())
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let predictor = Arc::clone(&predictor);
            std::thread::spawn(move || {
                SAMPLES
                    .iter()
                    .map(|text| predictor.classify(text).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
