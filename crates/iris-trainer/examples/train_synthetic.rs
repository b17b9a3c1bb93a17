use iris_trainer::datasets::{iris_like, IRIS_LABEL};
use iris_trainer::tracking::MemoryTracker;
use iris_trainer::train_iris;

fn main() {
    env_logger::init();

    // 150 rows: 50 per species, 4 measurement columns
    let dataset = iris_like(50, 42);
    println!("Synthetic dataset: {} rows x {} columns", dataset.n_rows(), dataset.n_cols());

    let mut tracker = MemoryTracker::new();
    let trained = train_iris(&dataset, IRIS_LABEL, &mut tracker).expect("training failed");

    println!(
        "Trained on {} rows, held out {} rows",
        trained.split_sizes.0, trained.split_sizes.1
    );
    if let Some(run) = tracker.last_run() {
        for (name, value) in run.metrics.scalars() {
            println!("  {:<10} {:.4}", name, value);
        }
        for fi in &run.feature_importances {
            println!("  importance[{}] = {:.3}", fi.feature, fi.importance);
        }
    }

    let predicted = trained.predict_labels(&dataset).expect("prediction failed");
    println!("First five predictions: {:?}", &predicted[..5]);
}
