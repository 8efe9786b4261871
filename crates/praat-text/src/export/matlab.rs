//! MATLAB source text exports.

use std::fmt::Write;

use crate::formant::FormantReport;
use crate::textgrid::AnnotationDocument;

/// Renders a report as a `struct(...)` expression for `eval`.
///
/// Fields appear in the order `xmin, xmax, nx, dx, x1, maxnFormants, t,
/// formants, bandwidths, intensity`. Per-frame rows of `formants` and
/// `bandwidths` are separated by `;`, elements by `,`; missing slots are
/// `NaN`.
///
/// # Examples
///
/// ```
/// use praat_text::formant::FormantReport;
/// use praat_text::export::matlab::formant_literal;
///
/// let report = FormantReport::parse_str(concat!(
///     "File type = \"ooTextFile\"\n",
///     "Object class = \"Formant 2\"\n",
///     "xmin = 0\nxmax = 0.01\nnx = 1\ndx = 0.01\nx1 = 0.005\nmaxnFormants = 2\n",
///     "frames []:\n",
///     "    frames [1]:\n",
///     "        intensity = 0.5\n",
///     "        formant []:\n",
///     "            formant [1]:\n",
///     "                frequency = 700\n",
///     "                bandwidth = 80\n",
/// )).unwrap();
///
/// let literal = formant_literal(&report);
/// assert!(literal.starts_with("struct('xmin',0.0,"));
/// assert!(literal.contains("'formants',[700.0,NaN]"));
/// ```
#[must_use]
pub fn formant_literal(report: &FormantReport) -> String {
    let frames = report.frames();
    let times: Vec<Option<f64>> = frames.iter().map(|f| Some(f.time())).collect();
    let intensity: Vec<Option<f64>> = frames.iter().map(|f| Some(f.intensity())).collect();
    let formants: Vec<&[Option<f64>]> = frames.iter().map(|f| f.formants()).collect();
    let bandwidths: Vec<&[Option<f64>]> = frames.iter().map(|f| f.bandwidths()).collect();

    let fields = [
        ("xmin", number(Some(report.xmin()))),
        ("xmax", number(Some(report.xmax()))),
        ("nx", report.nx().to_string()),
        ("dx", number(Some(report.dx()))),
        ("x1", number(Some(report.x1()))),
        ("maxnFormants", report.max_formants().to_string()),
        ("t", row(&times)),
        ("formants", matrix(&formants)),
        ("bandwidths", matrix(&bandwidths)),
        ("intensity", row(&intensity)),
    ];

    let body: Vec<String> = fields
        .iter()
        .map(|(name, value)| format!("'{name}',{value}"))
        .collect();
    format!("struct({})", body.join(","))
}

/// Renders a TextGrid as a MATLAB script building `x.interval(tier).label(i)`.
///
/// Each label gets its `[xmin, xmax]` bounds (six decimals) and its text;
/// single quotes in labels are doubled.
#[must_use]
pub fn textgrid_script(document: &AnnotationDocument) -> String {
    let mut script = String::from("x = struct();\n");
    for (j, tier) in document.tiers().iter().enumerate() {
        let tier_number = j + 1;
        if j == 0 {
            let _ = writeln!(script, "x.interval({tier_number}) = struct();");
        }
        for (i, interval) in tier.intervals().iter().enumerate() {
            let label = i + 1;
            let _ = writeln!(
                script,
                "x.interval({tier_number}).label({label}).x = [{:.6}, {:.6}];",
                interval.xmin, interval.xmax
            );
            let _ = writeln!(
                script,
                "x.interval({tier_number}).label({label}).text = '{}';",
                interval.text.replace('\'', "''")
            );
        }
    }
    script
}

fn number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) if v.is_infinite() && v > 0.0 => "Inf".to_string(),
        Some(v) if v.is_infinite() => "-Inf".to_string(),
        Some(v) => format!("{v:?}"),
        None => "NaN".to_string(),
    }
}

fn row(values: &[Option<f64>]) -> String {
    let cells: Vec<String> = values.iter().copied().map(number).collect();
    format!("[{}]", cells.join(","))
}

fn matrix(rows: &[&[Option<f64>]]) -> String {
    let rendered: Vec<String> = rows
        .iter()
        .map(|r| {
            r.iter()
                .copied()
                .map(number)
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    format!("[{}]", rendered.join(";"))
}
