//! Python bindings, built with `--features python`.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::KMeansConfig;
use crate::error::KnnError;
use crate::kmeans::KMeansClustering;
use crate::knn::{KnnClassifier, euclidean_distance};

impl From<KnnError> for PyErr {
    fn from(err: KnnError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Euclidean distance; the shorter vector is zero-padded.
#[pyfunction]
#[pyo3(name = "euclidean_distance")]
fn euclidean_distance_py(a: Vec<f64>, b: Vec<f64>) -> f64 {
    euclidean_distance(&a, &b)
}

#[pyclass(name = "KnnClassifier")]
struct PyKnnClassifier {
    classifier: KnnClassifier<f64, String>,
}

#[pymethods]
impl PyKnnClassifier {
    #[new]
    #[pyo3(signature = (k = 3))]
    fn new(k: usize) -> PyResult<Self> {
        Ok(PyKnnClassifier { classifier: KnnClassifier::new(k)? })
    }

    fn fit(&mut self, vectors: Vec<Vec<f64>>, labels: Vec<String>) -> PyResult<()> {
        Ok(self.classifier.fit(vectors, labels)?)
    }

    fn predict_single(&self, query: Vec<f64>) -> PyResult<String> {
        Ok(self.classifier.predict_single(&query)?)
    }

    fn predict(&self, queries: Vec<Vec<f64>>) -> PyResult<Vec<String>> {
        Ok(self.classifier.predict(&queries)?)
    }

    #[getter]
    fn k(&self) -> usize {
        self.classifier.k()
    }
}

#[pyclass(name = "KMeansClustering")]
struct PyKMeansClustering {
    model: KMeansClustering,
}

#[pymethods]
impl PyKMeansClustering {
    #[new]
    #[pyo3(signature = (k = 3, n_iters = 1000, seed = None))]
    fn new(k: usize, n_iters: usize, seed: Option<u64>) -> PyResult<Self> {
        let config = KMeansConfig { k, n_iters, seed };
        Ok(PyKMeansClustering { model: KMeansClustering::from_config(config)? })
    }

    fn fit(&mut self, points: Vec<Vec<f64>>) -> PyResult<()> {
        Ok(self.model.fit(&points)?)
    }

    fn predict(&self, points: Vec<Vec<f64>>) -> PyResult<Vec<Option<usize>>> {
        Ok(self.model.predict(&points)?)
    }

    #[getter]
    fn centroids(&self) -> Vec<Vec<f64>> {
        self.model.centroids().to_vec()
    }
}

#[pymodule]
fn knn_classifier(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(euclidean_distance_py, m)?)?;
    m.add_class::<PyKnnClassifier>()?;
    m.add_class::<PyKMeansClustering>()?;
    Ok(())
}
