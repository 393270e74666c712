#![no_main]

use conversion_cardinality::Estimator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut estimator) = Estimator::from_bytes(data) {
        assert_eq!(Estimator::from_bytes(&estimator.to_bytes()).as_ref(), Ok(&estimator));
        estimator.insert(&1);
        assert!(estimator.estimate() > 0);
    }
});
