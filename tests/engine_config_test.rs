// tests/engine_config_test.rs
use phoenix_mc::mc::{
    ContinuitySeed, KnockPolicy, PhoenixEngineConfig, PhoenixEngineConfigBuilder, SamplingPlan,
    StepSpec,
};
use phoenix_mc::rng::RandomPolicy;
use phoenix_mc::PhoenixError;

#[test]
fn test_config_from_json_uses_defaults() {
    let config: PhoenixEngineConfig =
        serde_json::from_str(r#"{ "steps": 12, "samples": 1000, "seed": 3 }"#).unwrap();

    assert_eq!(config.step_spec(), StepSpec::Steps(12));
    assert_eq!(config.sampling_plan(), SamplingPlan::Fixed { samples: 1000 });
    assert_eq!(config.seed(), 3);
    assert_eq!(config.random_policy(), RandomPolicy::PseudoRandom);
    assert_eq!(config.knock_policy(), KnockPolicy::ResetOnDownTouch);
    assert_eq!(config.continuity_seed(), ContinuitySeed::Fixed(5));
}

#[test]
fn test_invalid_json_config_is_rejected() {
    let both = serde_json::from_str::<PhoenixEngineConfig>(
        r#"{ "steps": 12, "steps_per_year": 52, "samples": 10 }"#,
    );
    let message = both.unwrap_err().to_string();
    assert!(message.contains("number of steps overspecified"), "{}", message);

    let no_estimate = serde_json::from_str::<PhoenixEngineConfig>(
        r#"{ "steps": 12, "tolerance": 0.1, "random_policy": "LowDiscrepancy" }"#,
    );
    assert!(no_estimate.is_err());
}

#[test]
fn test_config_survives_json() {
    let config = PhoenixEngineConfig::builder()
        .steps_per_year(252)
        .absolute_tolerance(0.05)
        .max_samples(50_000)
        .antithetic_variate(true)
        .bias(true)
        .seed(99)
        .continuity_seed(ContinuitySeed::Derived)
        .knock_policy(KnockPolicy::AccumulateThroughDownTouch)
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let restored: PhoenixEngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);
}

#[test]
fn test_builder_reports_first_problem() {
    // conflict recorded by the setters wins over the missing step count
    let err = PhoenixEngineConfigBuilder::default()
        .samples(10)
        .absolute_tolerance(0.1)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        PhoenixError::configuration("tolerance", "number of samples already set")
    );

    let err = PhoenixEngineConfig::builder()
        .steps(0)
        .build()
        .unwrap_err();
    assert!(matches!(err, PhoenixError::Configuration { ref field, .. } if field == "steps"));
}
