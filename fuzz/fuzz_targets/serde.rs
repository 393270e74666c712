#![no_main]

use conversion_cardinality::Estimator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut estimator) = serde_json::from_slice::<Estimator>(data) {
        estimator.insert(&1);
        assert!(estimator.estimate() > 0);
    }
});
