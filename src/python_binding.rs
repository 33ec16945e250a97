use crate::interface::Parameters;
use crate::kernel::{Flat, Gaussian, Kernel};
use crate::MeanShift;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

type LibDataType = f64;

fn to_py_err(error: crate::MeanShiftError) -> PyErr {
    PyValueError::new_err(error.to_string())
}

/// Shifts every point to its mode under a Gaussian kernel.
#[pyfunction(bandwidth = "1.0", max_iter = "Some(300)")]
fn mean_shift<'py>(
    py: Python<'py>,
    points: PyReadonlyArray2<'py, LibDataType>,
    bandwidth: LibDataType,
    max_iter: Option<usize>,
) -> PyResult<&'py PyArray2<LibDataType>> {
    let parameters = Parameters::default()
        .with_bandwidth(bandwidth)
        .with_max_iter(max_iter);
    let mut mean_shift = MeanShift::<LibDataType, Gaussian>::new(parameters).map_err(to_py_err)?;

    let centroids = mean_shift.shift(points.as_array()).map_err(to_py_err)?;
    Ok(centroids.into_pyarray(py))
}

#[pyfunction]
fn meanshift_algorithm<'py>(
    py: Python<'py>,
    points: PyReadonlyArray2<'py, LibDataType>,
    n_threads: usize,
    bandwidth: Option<LibDataType>,
    kernel: String,
) -> PyResult<(&'py PyArray2<LibDataType>, Vec<usize>)> {
    let parameters = Parameters {
        n_threads,
        bandwidth,
        ..Default::default()
    };

    let (cluster_centers, labels) = match kernel.as_str() {
        <Gaussian as Kernel<LibDataType>>::NAME => {
            MeanShift::<LibDataType, Gaussian>::new(parameters)
                .and_then(|mut mean_shift| mean_shift.cluster(points.as_array()))
        }
        <Flat as Kernel<LibDataType>>::NAME => {
            MeanShift::<LibDataType, Flat>::new(parameters)
                .and_then(|mut mean_shift| mean_shift.cluster(points.as_array()))
        }
        _ => {
            return Err(PyValueError::new_err(format!(
                "Kernel {} not known.",
                kernel
            )))
        }
    }
    .map_err(to_py_err)?;

    Ok((cluster_centers.into_pyarray(py), labels))
}

#[pymodule]
fn gaussian_meanshift(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mean_shift, m)?)?;
    m.add_function(wrap_pyfunction!(meanshift_algorithm, m)?)?;

    Ok(())
}
