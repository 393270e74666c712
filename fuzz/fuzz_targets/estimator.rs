#![no_main]

use conversion_cardinality::{Estimator, PrecisionConfig};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let config = PrecisionConfig::canonical().with_sparse(data[0] & 1 == 1);
    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut estimator1 = Estimator::empty(config);
    for chunk in first_half.chunks(4) {
        estimator1.insert(chunk);
        assert!(estimator1.estimate() > 0);
        assert!(estimator1.size_of() > 0);
    }

    let mut estimator2 = Estimator::empty(config);
    for chunk in second_half.chunks(4) {
        estimator2.insert(chunk);
        assert!(estimator2.estimate() > 0);
        assert!(estimator2.size_of() > 0);
    }

    let union = estimator1.union(&estimator2).unwrap();
    assert_eq!(union, estimator2.union(&estimator1).unwrap());
    assert_eq!(Estimator::from_bytes(&union.to_bytes()).unwrap(), union);
});
