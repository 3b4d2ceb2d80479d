use safety_risk::{AssessmentInput, CrowdDensity, RiskEngine, RiskLevel, RiskWeights, evaluate};

fn input(hour: i64, crowd: CrowdDensity, crime: i64, speed: f64, network: bool) -> AssessmentInput {
    AssessmentInput {
        hour,
        latitude: 40.7128,
        longitude: -74.0060,
        crowd_density: crowd,
        crime_score: crime,
        movement_speed: speed,
        network_available: network,
    }
}

/// A grid mixing in-domain and out-of-domain values for every field.
fn grid() -> Vec<AssessmentInput> {
    let mut inputs = Vec::new();
    for hour in [-5, 0, 5, 6, 14, 20, 21, 23, 24, 99] {
        for crowd in [CrowdDensity::Low, CrowdDensity::Medium, CrowdDensity::High] {
            for crime in [-1, 0, 30, 60, 61, 100, 150] {
                for speed in [-2.0, 0.0, 0.5, f64::NAN] {
                    for network in [true, false] {
                        for (lat, lon) in [(40.7, -74.0), (999.0, 999.0), (f64::NAN, 0.0)] {
                            inputs.push(AssessmentInput {
                                latitude: lat,
                                longitude: lon,
                                ..input(hour, crowd, crime, speed, network)
                            });
                        }
                    }
                }
            }
        }
    }
    inputs
}

#[test]
fn evaluation_is_deterministic() {
    let engine = RiskEngine::default();
    for case in grid() {
        assert_eq!(engine.evaluate(&case), engine.evaluate(&case), "{case:?}");
    }
}

#[test]
fn score_is_bounded_and_level_consistent() {
    let weights = RiskWeights::default();
    for case in grid() {
        let result = evaluate(&case, &weights);
        let score = result.risk_score();
        assert!(score <= 100, "{case:?}");

        let expected = match score {
            0..=30 => RiskLevel::Low,
            31..=60 => RiskLevel::Medium,
            _ => RiskLevel::High,
        };
        assert_eq!(result.risk_level(), expected, "{case:?}");
        assert_eq!(
            result.emergency_actions().is_some(),
            result.risk_level() == RiskLevel::High,
            "{case:?}"
        );
        if let Some(actions) = result.emergency_actions() {
            assert!(!actions.is_empty());
        }
    }
}

#[test]
fn more_crime_never_lowers_the_score() {
    let engine = RiskEngine::default();
    for speed in [0.0, 1.2] {
        for network in [true, false] {
            let mut previous = 0;
            for crime in 0..=100 {
                let score = engine
                    .evaluate(&input(22, CrowdDensity::Medium, crime, speed, network))
                    .risk_score();
                assert!(score >= previous, "crime {crime}, speed {speed}");
                previous = score;
            }
        }
    }
}

#[test]
fn thinner_crowds_never_lower_the_score() {
    let engine = RiskEngine::default();
    for hour in [3, 12] {
        let scores: Vec<u8> = [CrowdDensity::High, CrowdDensity::Medium, CrowdDensity::Low]
            .into_iter()
            .map(|crowd| engine.evaluate(&input(hour, crowd, 40, 1.0, true)).risk_score())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{scores:?}");
    }
}

#[test]
fn losing_network_never_lowers_the_score() {
    let engine = RiskEngine::default();
    for crime in [0, 50, 90] {
        let online = engine.evaluate(&input(10, CrowdDensity::Low, crime, 0.0, true));
        let offline = engine.evaluate(&input(10, CrowdDensity::Low, crime, 0.0, false));
        assert!(offline.risk_score() >= online.risk_score());
    }
}

#[test]
fn high_risk_text_matches_rendering() {
    let result = RiskEngine::default().evaluate(&input(2, CrowdDensity::Low, 85, 0.0, false));
    let text = result.to_string();
    assert!(text.starts_with("Risk Score: 81\nRisk Level: High\n"));
    assert!(text.contains("Recommended Action: Prioritize immediate safety."));
    assert!(text.contains("\n  - Trigger Alarm\n  - Send SOS to emergency contacts"));
}
