//! Level 5 MAT-file export.
//!
//! Writes one double-precision variable per report field, uncompressed and
//! little-endian, so `load('file.mat')` in MATLAB (or `scipy.io.loadmat`)
//! yields `xmin, xmax, nx, dx, x1, maxnFormants` as scalars, `t` and
//! `intensity` as `1 x frames` rows and `formants`/`bandwidths` as
//! `frames x maxnFormants` matrices. Missing formant slots are `NaN`.

use crate::formant::FormantReport;

const HEADER_TEXT_LEN: usize = 116;
const HEADER_SUBSYS_LEN: usize = 8;
const MAT_VERSION: u16 = 0x0100;

const MI_INT8: u32 = 1;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;

const MX_DOUBLE_CLASS: u32 = 6;

/// A dense real matrix stored column-major.
struct Variable<'n> {
    name: &'n str,
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl<'n> Variable<'n> {
    fn scalar(name: &'n str, value: f64) -> Self {
        Self {
            name,
            rows: 1,
            cols: 1,
            data: vec![value],
        }
    }

    fn row(name: &'n str, values: Vec<f64>) -> Self {
        Self {
            name,
            rows: 1,
            cols: values.len(),
            data: values,
        }
    }

    fn matrix(name: &'n str, rows: &[&[Option<f64>]], cols: usize) -> Self {
        let mut data = Vec::with_capacity(rows.len() * cols);
        for col in 0..cols {
            for row in rows {
                data.push(row.get(col).copied().flatten().unwrap_or(f64::NAN));
            }
        }
        Self {
            name,
            rows: rows.len(),
            cols,
            data,
        }
    }
}

/// Encodes `report` as MAT-file bytes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn encode_report(report: &FormantReport) -> Vec<u8> {
    let frames = report.frames();
    let width = report.max_formants();
    let formants: Vec<&[Option<f64>]> = frames.iter().map(|f| f.formants()).collect();
    let bandwidths: Vec<&[Option<f64>]> = frames.iter().map(|f| f.bandwidths()).collect();

    let variables = [
        Variable::scalar("xmin", report.xmin()),
        Variable::scalar("xmax", report.xmax()),
        Variable::scalar("nx", report.nx() as f64),
        Variable::scalar("dx", report.dx()),
        Variable::scalar("x1", report.x1()),
        Variable::scalar("maxnFormants", width as f64),
        Variable::row("t", frames.iter().map(|f| f.time()).collect()),
        Variable::matrix("formants", &formants, width),
        Variable::matrix("bandwidths", &bandwidths, width),
        Variable::row("intensity", frames.iter().map(|f| f.intensity()).collect()),
    ];

    let mut out = header();
    for variable in &variables {
        write_matrix(&mut out, variable);
    }
    out
}

fn header() -> Vec<u8> {
    let description = format!(
        "MATLAB 5.0 MAT-file, Platform: {}, Created by: praat-text {}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    let mut out = description.into_bytes();
    out.resize(HEADER_TEXT_LEN, b' ');
    out.extend_from_slice(&[0; HEADER_SUBSYS_LEN]);
    out.extend_from_slice(&MAT_VERSION.to_le_bytes());
    out.extend_from_slice(b"IM");
    out
}

fn write_matrix(out: &mut Vec<u8>, variable: &Variable<'_>) {
    let mut body = Vec::new();

    let mut flags = Vec::with_capacity(8);
    flags.extend_from_slice(&MX_DOUBLE_CLASS.to_le_bytes());
    flags.extend_from_slice(&0u32.to_le_bytes());
    write_element(&mut body, MI_UINT32, &flags);

    let mut dims = Vec::with_capacity(8);
    for extent in [variable.rows, variable.cols] {
        let extent = i32::try_from(extent).unwrap_or(i32::MAX);
        dims.extend_from_slice(&extent.to_le_bytes());
    }
    write_element(&mut body, MI_INT32, &dims);

    write_element(&mut body, MI_INT8, variable.name.as_bytes());

    let real: Vec<u8> = variable.data.iter().flat_map(|v| v.to_le_bytes()).collect();
    write_element(&mut body, MI_DOUBLE, &real);

    write_element(out, MI_MATRIX, &body);
}

/// Writes a tagged data element padded to an 8-byte boundary.
fn write_element(out: &mut Vec<u8>, data_type: u32, data: &[u8]) {
    let len = u32::try_from(data.len()).unwrap_or(u32::MAX);
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(data);
    out.resize(out.len() + padding(data.len()), 0);
}

fn padding(len: usize) -> usize {
    (8 - len % 8) % 8
}
