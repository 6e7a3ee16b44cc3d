//! Interactive CSV picker.
//!
//! clap handles structured flags; the picker covers the "run `perfview` with no
//! file and choose one" case. It lists `*.csv` files under the current working
//! directory together with their header row, so a `date,value` export is easy
//! to spot among unrelated CSVs.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth for finding CSV files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Header previews longer than this are cut.
const HEADER_PREVIEW_CHARS: usize = 40;

/// A discovered CSV file plus its first line (when readable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvCandidate {
    pub path: PathBuf,
    pub header: Option<String>,
}

/// What the user typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Choice {
    Quit,
    /// Zero-based index into the candidate list.
    Index(usize),
    OutOfRange(usize),
    Path(PathBuf),
    Empty,
}

/// Prompt the user to select a CSV file from the current directory tree.
///
/// Accepts a number from the list or an explicit path; `q` cancels.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let candidates = discover_csv_files();
    if candidates.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv files found. Provide one with `perfview show -f <file.csv>`, or create a demo series with `perfview sample -o demo.csv`.",
        ));
    }

    println!("Found {} CSV file(s):", candidates.len());
    for (idx, c) in candidates.iter().enumerate() {
        println!("{}", format_candidate(idx, c));
    }

    loop {
        print!("Select a file by number (1-{}) or type a path (q to quit): ", candidates.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide a CSV path with `perfview tui -f <file.csv>`.",
            ));
        }

        let path = match parse_choice(&input, candidates.len()) {
            Choice::Quit => return Err(AppError::new(2, "Canceled.")),
            Choice::Empty => continue,
            Choice::OutOfRange(n) => {
                println!("Invalid choice: {n}. Enter a number between 1 and {}.", candidates.len());
                continue;
            }
            Choice::Index(i) => candidates[i].path.clone(),
            Choice::Path(p) => p,
        };

        match validate_csv_path(&path) {
            Ok(path) => return Ok(path),
            Err(err) => println!("{err}"),
        }
    }
}

fn parse_choice(input: &str, n_candidates: usize) -> Choice {
    let input = input.trim();
    if input.is_empty() {
        return Choice::Empty;
    }
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=n_candidates).contains(&n) => Choice::Index(n - 1),
        Ok(n) => Choice::OutOfRange(n),
        Err(_) => Choice::Path(PathBuf::from(input)),
    }
}

fn format_candidate(idx: usize, c: &CsvCandidate) -> String {
    match &c.header {
        Some(header) => format!("{:>3}) {}  [{}]", idx + 1, pretty_path(&c.path), preview(header)),
        None => format!("{:>3}) {}", idx + 1, pretty_path(&c.path)),
    }
}

fn preview(header: &str) -> String {
    if header.chars().count() <= HEADER_PREVIEW_CHARS {
        return header.to_string();
    }
    let cut: String = header.chars().take(HEADER_PREVIEW_CHARS).collect();
    format!("{cut}...")
}

/// Validate the provided path points to an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file (got: {}). Use -f to pass a CSV path.", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// Discover `*.csv` files under the current directory (deterministic order).
pub fn discover_csv_files() -> Vec<CsvCandidate> {
    find_csv_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
        .into_iter()
        .map(|path| {
            let header = read_header(&path);
            CsvCandidate { path, header }
        })
        .collect()
}

/// First non-empty line of a file, BOM stripped.
fn read_header(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    BufReader::new(file)
        .lines()
        .take(5)
        .map_while(Result::ok)
        .map(|line| line.trim_start_matches('\u{feff}').trim().to_string())
        .find(|line| !line.is_empty())
}

fn find_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, 0, max_depth, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn walk(dir: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                walk(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    name.starts_with('.') || matches!(name, "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
