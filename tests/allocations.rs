#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use conversion_cardinality::{Estimator, Layout, PrecisionConfig};
use tabled::{
    settings::{Settings, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct Record {
    cardinality: usize,
    canonical: String,
    sparse: String,
    encoded: String,
}

struct Usage {
    layout: Layout,
    size: usize,
    total_bytes: u64,
    total_blocks: u64,
}

fn measure_memory_usage(config: PrecisionConfig, cardinality: usize) -> Usage {
    let _profiler = dhat::Profiler::builder().testing().build();
    let mut estimator = Estimator::empty(config);
    for i in 0..cardinality {
        estimator.insert(&i);
    }
    let stats = dhat::HeapStats::get();
    Usage {
        layout: estimator.layout(),
        size: estimator.size_of(),
        total_bytes: stats.total_bytes,
        total_blocks: stats.total_blocks,
    }
}

fn describe(usage: &Usage) -> String {
    format!(
        "{:?}: {} / {} / {}",
        usage.layout, usage.size, usage.total_bytes, usage.total_blocks
    )
}

#[test]
fn test_allocations() {
    let canonical = PrecisionConfig::canonical();
    let sparse = canonical.with_sparse(true);

    let results: Vec<Record> = std::iter::once(0)
        .chain((0..).map(|c| 1 << c))
        .take_while(|&c| c <= 1 << 16)
        .map(|cardinality| {
            let canonical_usage = measure_memory_usage(canonical, cardinality);
            let sparse_usage = measure_memory_usage(sparse, cardinality);

            if cardinality <= canonical.explicit_threshold() {
                assert!(matches!(canonical_usage.layout, Layout::Empty | Layout::Explicit));
            }
            if cardinality == 0 {
                assert_eq!(canonical_usage.total_blocks, 0);
                assert_eq!(sparse_usage.total_blocks, 0);
            }

            let mut estimator = Estimator::empty(canonical);
            for i in 0..cardinality {
                estimator.insert(&i);
            }
            Record {
                cardinality,
                canonical: describe(&canonical_usage),
                sparse: describe(&sparse_usage),
                encoded: estimator.to_bytes().len().to_string(),
            }
        })
        .collect();

    let table_config = Settings::default().with(Style::markdown());
    let markdown = Table::new(results).with(table_config).to_string();
    println!("{}", markdown);
}
