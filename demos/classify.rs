//! Fits the two-cluster sample set and classifies two query points.
//!
//! Run with `RUST_LOG=debug cargo run --example classify` to see the
//! classifier's log output.

use knn_classifier::KnnClassifier;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let x_train = vec![
        vec![1.0, 12.0],
        vec![2.0, 5.0],
        vec![3.0, 6.0],
        vec![3.0, 10.0],
        vec![3.5, 8.0],
        vec![2.0, 11.0],
        vec![2.0, 9.0],
        vec![1.0, 7.0],
        vec![5.0, 3.0],
        vec![3.0, 2.0],
        vec![1.5, 9.0],
        vec![7.0, 1.0],
        vec![5.0, 1.0],
        vec![3.8, 1.0],
        vec![5.6, 4.0],
        vec![4.0, 2.0],
        vec![2.0, 5.0],
    ];
    let y_train = vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0];

    let mut knn = KnnClassifier::new(3)?;
    knn.fit(x_train, y_train)?;

    let x_test = vec![vec![2.5, 7.0], vec![6.0, 1.0]];
    let y_test = knn.predict(&x_test)?;
    println!("{:?}", y_test);
    Ok(())
}
