use anyhow::{anyhow, bail, Context, Result};
use prony_rs::kernel::KernelLifecycle;
use prony_rs::linalg::{toeplitz_dyn, ToeplitzBuild1D, ToeplitzConfig, ToeplitzKernel};
use prony_rs::na::{Complex, DMatrix};
use prony_rs::signal::filter::design::{prony_dyn, BaFormatFilter, PronyConfig, PronyKernel};
use prony_rs::signal::filter::{impz_dyn, ImpzConfig, ImpzKernel};
use prony_rs::signal::traits::{ImpulseResponse1D, PronyDesign1D};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const DEFAULT_PYTHON_BIN: &str = "python";

/// Maximum absolute deviation from the Python reference before a case fails.
const CONTRACT_TOLERANCE: f64 = 1e-9;

const PY_SIGNAL_SCRIPT: &str = r#"
import json
import sys
import time
import numpy as np
import scipy
import scipy.linalg
import scipy.signal

env = json.loads(sys.stdin.read())
op = env["op"]
iters = int(env["iters"])
p = env["payload"]

def _as_array(key):
    return np.asarray(p[key], dtype=float)

def _as_complex(key):
    v = np.asarray(p[key], dtype=float).reshape(-1, 2)
    return v[:, 0] + 1j * v[:, 1]

def _flat(v):
    v = np.asarray(v).reshape(-1)
    if np.iscomplexobj(v):
        return np.stack([v.real, v.imag], axis=1).reshape(-1).astype(float)
    return v.astype(float)

def _impz(b, a, n):
    x = np.zeros(n, dtype=np.result_type(b, a))
    x[0] = 1
    return scipy.signal.lfilter(b, a, x)

def _prony(h, nb, na):
    h = np.array(h)
    order = max(nb, na)
    k = max(len(h) - 1, order)
    if len(h) < order + 2:
        h = np.concatenate([h, np.zeros(order + 2 - len(h), dtype=h.dtype)])
    c = h[0] if h[0] != 0 else 1
    col = h[: k + 1] / c
    row = np.zeros(na + 1, dtype=col.dtype)
    row[0] = col[0]
    H = scipy.linalg.toeplitz(col, row)
    H1 = H[: nb + 1, :]
    h1 = H[nb + 1 :, 0]
    H2 = H[nb + 1 :, 1:]
    x = np.linalg.solve(-H2, h1) if na > 0 else np.zeros(0, dtype=col.dtype)
    a = np.concatenate([[1], x])
    b = c * (a @ H1.T)
    return b, a

def _compute():
    if op == "prony":
        b, a = _prony(_as_array("h"), int(p["nb"]), int(p["na"]))
        return np.concatenate([b, a])
    if op == "prony_complex":
        b, a = _prony(_as_complex("h"), int(p["nb"]), int(p["na"]))
        return np.concatenate([b, a])
    if op == "impz":
        return _impz(_as_array("b"), _as_array("a"), int(p["n"]))
    if op == "toeplitz":
        return scipy.linalg.toeplitz(_as_array("c"), _as_array("r")).reshape(-1)

    raise RuntimeError(f"unsupported op: {op}")

y = _flat(_compute())

t0 = time.perf_counter_ns()
for _ in range(iters):
    _compute()
t1 = time.perf_counter_ns()

print(json.dumps({
    "output": y.tolist(),
    "avg_ns": (t1 - t0) / max(iters, 1),
    "python_version": sys.version.split()[0],
    "numpy_version": np.__version__,
    "scipy_version": scipy.__version__,
}))
"#;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct PythonEval {
    output: Vec<f64>,
    avg_ns: f64,
    python_version: String,
    numpy_version: String,
    scipy_version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ContractRow {
    case_id: String,
    passed: bool,
    pearson_r: f64,
    mae: f64,
    rmse: f64,
    max_abs: f64,
    rust_candidate_ns: f64,
    rust_baseline_ns: f64,
    python_ns: f64,
    speedup_vs_baseline: f64,
    speedup_vs_python: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContractBundle {
    generated_epoch_seconds: u64,
    python_executable: String,
    python_version: String,
    numpy_version: String,
    scipy_version: String,
    tolerance: f64,
    rows: Vec<ContractRow>,
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("contracts") => run_contracts(),
        _ => {
            eprintln!("Usage:");
            eprintln!("  cargo run -p xtask -- contracts");
            Ok(())
        }
    }
}

fn run_contracts() -> Result<()> {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let out_dir = PathBuf::from(format!("target/contracts/{ts}"));
    fs::create_dir_all(&out_dir).context("creating contract output directory")?;

    let python_bin = detect_python_bin();
    let mut rows = Vec::new();

    // scipy.signal.butter(4, 0.2)
    let butter_b = vec![0.00482434, 0.01929737, 0.02894606, 0.01929737, 0.00482434];
    let butter_a = vec![1.0, -2.36951301, 2.31398841, -1.05466541, 0.18737949];

    // Impulse response
    {
        let case_id = "impz_butter4_f64";
        let n = 64;
        let kernel = ImpzKernel::try_new(ImpzConfig { n })?;
        let candidate = kernel
            .run_alloc(butter_b.as_slice(), butter_a.as_slice())
            .map_err(|e| anyhow!("impz candidate execution failed: {e}"))?;
        let baseline = impz_dyn(&butter_b, &butter_a, n)?;
        let py = python_signal_eval(
            &python_bin,
            "impz",
            json!({ "b": butter_b, "a": butter_a, "n": n }),
            200,
        )?;

        let candidate_ns = benchmark_avg_ns(200, || {
            kernel
                .run_alloc(butter_b.as_slice(), butter_a.as_slice())
                .map(|_| ())
                .map_err(|e| anyhow!("impz candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(200, || {
            impz_dyn(&butter_b, &butter_a, n)?;
            Ok(())
        })?;

        record_case(
            &mut rows,
            case_id,
            candidate,
            baseline,
            py,
            candidate_ns,
            baseline_ns,
        )?;
    }

    // Toeplitz construction
    {
        let case_id = "toeplitz_lower_f64";
        let c: Vec<f64> = (0..32)
            .map(|i| 0.9f64.powi(i) * (0.4 * i as f64).cos())
            .collect();
        let mut r = vec![0.0; 9];
        r[0] = c[0];

        let kernel = ToeplitzKernel::try_new(ToeplitzConfig { ncols: Some(r.len()) })?;
        let candidate: DMatrix<f64> = kernel
            .run(c.as_slice())
            .map_err(|e| anyhow!("toeplitz candidate execution failed: {e}"))?;
        let baseline = toeplitz_dyn(&c, &r);
        let py = python_signal_eval(&python_bin, "toeplitz", json!({ "c": c, "r": r }), 200)?;

        let candidate_ns = benchmark_avg_ns(200, || {
            ToeplitzBuild1D::<f64>::run(&kernel, c.as_slice())
                .map(|_| ())
                .map_err(|e| anyhow!("toeplitz candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(200, || {
            let _ = toeplitz_dyn(&c, &r);
            Ok(())
        })?;

        record_case(
            &mut rows,
            case_id,
            flatten_matrix_row_major(&candidate),
            flatten_matrix_row_major(&baseline),
            py,
            candidate_ns,
            baseline_ns,
        )?;
    }

    // Prony fits
    let real_cases: [(&str, Vec<f64>, usize, usize); 3] = [
        ("prony_butter4_f64", impz_dyn(&butter_b, &butter_a, 9)?, 4, 4),
        ("prony_allpole_padded_f64", vec![1.0, 0.5], 0, 3),
        (
            "prony_zero_lead_f64",
            vec![0.0, 1.0, 0.6, 0.21, -0.05, 0.12],
            2,
            3,
        ),
    ];
    for (case_id, h, nb, na) in real_cases {
        let kernel = PronyKernel::try_new(PronyConfig {
            nb,
            na,
            expected_len: Some(h.len()),
        })?;
        let candidate = kernel
            .run_alloc(h.as_slice())
            .map_err(|e| anyhow!("{case_id} candidate execution failed: {e}"))?;
        let baseline = prony_dyn(&h, nb, na)?;
        let py = python_signal_eval(
            &python_bin,
            "prony",
            json!({ "h": h, "nb": nb, "na": na }),
            200,
        )?;

        let candidate_ns = benchmark_avg_ns(200, || {
            PronyDesign1D::<f64>::run_alloc(&kernel, h.as_slice())
                .map(|_| ())
                .map_err(|e| anyhow!("{case_id} candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(200, || {
            prony_dyn(&h, nb, na)?;
            Ok(())
        })?;

        record_case(
            &mut rows,
            case_id,
            flatten_ba(candidate),
            flatten_ba(baseline),
            py,
            candidate_ns,
            baseline_ns,
        )?;
    }

    {
        let case_id = "prony_complex_c64";
        let b = [
            Complex::new(1.0, 0.0),
            Complex::new(-0.5, 0.2),
            Complex::new(0.0, 0.1),
        ];
        let a = [
            Complex::new(1.0, 0.0),
            Complex::new(-0.3, 0.4),
            Complex::new(0.2, -0.1),
            Complex::new(0.05, 0.0),
        ];
        let h = impz_dyn(&b, &a, 6)?;
        let kernel = PronyKernel::try_new(PronyConfig {
            nb: 2,
            na: 3,
            expected_len: Some(h.len()),
        })?;
        let candidate = kernel
            .run_alloc(h.as_slice())
            .map_err(|e| anyhow!("{case_id} candidate execution failed: {e}"))?;
        let baseline = prony_dyn(&h, 2, 3)?;
        let py = python_signal_eval(
            &python_bin,
            "prony_complex",
            json!({ "h": flatten_complex(&h), "nb": 2, "na": 3 }),
            200,
        )?;

        let candidate_ns = benchmark_avg_ns(200, || {
            PronyDesign1D::<Complex<f64>>::run_alloc(&kernel, h.as_slice())
                .map(|_| ())
                .map_err(|e| anyhow!("{case_id} candidate benchmark failed: {e}"))
        })?;
        let baseline_ns = benchmark_avg_ns(200, || {
            prony_dyn(&h, 2, 3)?;
            Ok(())
        })?;

        record_case(
            &mut rows,
            case_id,
            flatten_complex_ba(candidate),
            flatten_complex_ba(baseline),
            py,
            candidate_ns,
            baseline_ns,
        )?;
    }

    let versions = python_signal_eval(
        &python_bin,
        "impz",
        json!({ "b": [1.0], "a": [1.0], "n": 1 }),
        1,
    )?;
    let bundle = ContractBundle {
        generated_epoch_seconds: ts,
        python_executable: python_bin.display().to_string(),
        python_version: versions.python_version,
        numpy_version: versions.numpy_version,
        scipy_version: versions.scipy_version.unwrap_or_else(|| "unknown".into()),
        tolerance: CONTRACT_TOLERANCE,
        rows,
    };

    let summary_json = out_dir.join("summary.json");
    fs::write(
        &summary_json,
        serde_json::to_vec_pretty(&bundle).context("serializing contract summary")?,
    )
    .with_context(|| format!("writing {}", summary_json.display()))?;
    write_summary_csv(&out_dir.join("summary.csv"), &bundle.rows)?;

    println!("Contract artifacts:");
    println!("  - {}", summary_json.display());
    println!("  - {}", out_dir.join("summary.csv").display());
    println!("  - cases: {}", bundle.rows.len());

    let failed = bundle
        .rows
        .iter()
        .filter(|row| !row.passed)
        .map(|row| row.case_id.as_str())
        .collect::<Vec<_>>();
    if !failed.is_empty() {
        bail!("contract cases outside tolerance: {}", failed.join(", "));
    }
    Ok(())
}

fn detect_python_bin() -> PathBuf {
    std::env::var_os("PYTHON")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON_BIN))
}

fn python_signal_eval(
    python_bin: &Path,
    op: &str,
    payload: serde_json::Value,
    iters: usize,
) -> Result<PythonEval> {
    let mut child = Command::new(python_bin)
        .arg("-c")
        .arg(PY_SIGNAL_SCRIPT)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning python interpreter at {}", python_bin.display()))?;

    {
        let stdin = child.stdin.as_mut().context("opening python stdin")?;
        let env = json!({ "op": op, "iters": iters, "payload": payload });
        let payload_bytes = serde_json::to_vec(&env).context("serializing python payload")?;
        stdin
            .write_all(&payload_bytes)
            .context("writing payload to python stdin")?;
    }

    let output = child
        .wait_with_output()
        .context("waiting for python process")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python execution failed: {stderr}");
    }
    let stdout = String::from_utf8(output.stdout).context("parsing python stdout utf8")?;
    serde_json::from_str(stdout.trim()).context("parsing python json")
}

fn record_case(
    rows: &mut Vec<ContractRow>,
    case_id: &str,
    candidate: Vec<f64>,
    baseline: Vec<f64>,
    py: PythonEval,
    candidate_ns: f64,
    baseline_ns: f64,
) -> Result<()> {
    ensure_same_length(case_id, &candidate, &baseline)?;
    ensure_same_length(case_id, &candidate, &py.output)?;

    let max_abs = max_abs_error(&candidate, &py.output);
    rows.push(ContractRow {
        case_id: case_id.to_string(),
        passed: max_abs <= CONTRACT_TOLERANCE && candidate == baseline,
        pearson_r: pearson(&candidate, &py.output),
        mae: mean_abs_error(&candidate, &py.output),
        rmse: root_mean_squared_error(&candidate, &py.output),
        max_abs,
        rust_candidate_ns: candidate_ns,
        rust_baseline_ns: baseline_ns,
        python_ns: py.avg_ns,
        speedup_vs_baseline: baseline_ns / candidate_ns,
        speedup_vs_python: py.avg_ns / candidate_ns,
    });
    Ok(())
}

fn flatten_matrix_row_major(matrix: &DMatrix<f64>) -> Vec<f64> {
    let mut out = Vec::with_capacity(matrix.nrows() * matrix.ncols());
    for row in 0..matrix.nrows() {
        for col in 0..matrix.ncols() {
            out.push(matrix[(row, col)]);
        }
    }
    out
}

fn flatten_ba(ba: BaFormatFilter<f64>) -> Vec<f64> {
    let mut out = Vec::with_capacity(ba.b.len() + ba.a.len());
    out.extend(ba.b);
    out.extend(ba.a);
    out
}

fn flatten_complex(values: &[Complex<f64>]) -> Vec<f64> {
    values.iter().flat_map(|v| [v.re, v.im]).collect()
}

fn flatten_complex_ba(ba: BaFormatFilter<Complex<f64>>) -> Vec<f64> {
    let mut out = flatten_complex(&ba.b);
    out.extend(flatten_complex(&ba.a));
    out
}

fn ensure_same_length(case_id: &str, a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        bail!(
            "case {case_id} has mismatched output lengths: left={}, right={}",
            a.len(),
            b.len()
        );
    }
    Ok(())
}

fn benchmark_avg_ns<F>(iters: usize, mut f: F) -> Result<f64>
where
    F: FnMut() -> Result<()>,
{
    let start = Instant::now();
    for _ in 0..iters {
        f()?;
    }
    Ok(start.elapsed().as_nanos() as f64 / iters as f64)
}

fn mean_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .sum::<f64>()
        / a.len() as f64
}

fn root_mean_squared_error(a: &[f64], b: &[f64]) -> f64 {
    (a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        / a.len() as f64)
        .sqrt()
}

fn max_abs_error(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let da = *x - mean_a;
        let db = *y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        if a == b {
            1.0
        } else {
            0.0
        }
    } else {
        cov / (var_a.sqrt() * var_b.sqrt())
    }
}

fn write_summary_csv(path: &Path, rows: &[ContractRow]) -> Result<()> {
    let mut out = String::new();
    out.push_str("case_id,passed,pearson_r,mae,rmse,max_abs,rust_candidate_ns,rust_baseline_ns,python_ns,speedup_vs_baseline,speedup_vs_python\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{:.12},{:.12},{:.12},{:.12},{:.3},{:.3},{:.3},{:.6},{:.6}\n",
            row.case_id,
            row.passed,
            row.pearson_r,
            row.mae,
            row.rmse,
            row.max_abs,
            row.rust_candidate_ns,
            row.rust_baseline_ns,
            row.python_ns,
            row.speedup_vs_baseline,
            row.speedup_vs_python,
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))
}
