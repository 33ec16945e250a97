use csv::{ReaderBuilder, Trim};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use std::fs::File;
use std::str::FromStr;

pub fn read_data(file_path: &str) -> Array2<f64> {
    let file = File::open(file_path).unwrap();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);

    let n_columns = reader.headers().unwrap().len();

    let flat_data: Array1<f64> = reader
        .records()
        .flat_map(|rec| {
            rec.unwrap()
                .iter()
                .map(|b| f64::from_str(b).unwrap())
                .collect::<Vec<f64>>()
        })
        .collect();

    let n_rows = flat_data.len() / n_columns;
    flat_data
        .into_shape((n_rows, n_columns))
        .expect("Could not deserialize sent data")
}

pub fn to_rows(data: ArrayView2<f64>) -> Vec<Vec<f64>> {
    data.outer_iter().map(|row| row.to_vec()).collect()
}

pub fn column_means(data: ArrayView2<f64>) -> Array1<f64> {
    data.mean_axis(Axis(0)).unwrap()
}

pub fn close_l1(expected: f64, received: f64, tolerance: f64) {
    assert!(
        (expected - received).abs() < tolerance,
        "expected {} but received {} (tolerance {})",
        expected,
        received,
        tolerance
    );
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
