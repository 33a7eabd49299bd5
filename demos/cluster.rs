//! Clusters the eight-point sample into three groups and prints the centroids.

use knn_classifier::{KMeansClustering, KMeansConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let data = vec![
        vec![2.0, 10.0],
        vec![2.0, 5.0],
        vec![8.0, 4.0],
        vec![5.0, 8.0],
        vec![7.0, 5.0],
        vec![6.0, 4.0],
        vec![1.0, 2.0],
        vec![4.0, 9.0],
    ];

    let mut kmc = KMeansClustering::from_config(KMeansConfig::default().with_k(3).with_n_iters(100))?;
    kmc.fit(&data)?;

    println!("value of k :: {}", kmc.config().k);
    for (i, centroid) in kmc.centroids().iter().enumerate() {
        let coords: Vec<String> = centroid
            .iter()
            .enumerate()
            .map(|(f, v)| format!("x{}: {:.6}", f, v))
            .collect();
        println!("centroid no. {:02} -> ({})", i + 1, coords.join(", "));
    }
    Ok(())
}
