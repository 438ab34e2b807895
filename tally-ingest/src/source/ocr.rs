//! OCR fallback: rasterize one PDF page with `pdftoppm`, recognize it with `tesseract`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempPath;
use tracing::{debug, error};

use super::{Document, TextSourceError};

const PDFTOPPM: &str = "pdftoppm";
const TESSERACT: &str = "tesseract";
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Page recognizer used when a page has no native text
pub trait Ocr: Send + Sync {
    fn recognize(&self, document: &dyn Document, index: usize) -> Result<String, TextSourceError>;
}

#[derive(Debug, Clone)]
pub struct OcrSettings {
    pub dpi: u32,
    /// Tesseract page segmentation mode
    pub psm: u8,
    pub timeout: Duration,
    /// Explicit tool locations; looked up on `PATH` when unset
    pub pdftoppm: Option<PathBuf>,
    pub tesseract: Option<PathBuf>,
    /// Where page images are written; the system temp directory when unset
    pub scratch_dir: Option<PathBuf>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            dpi: 300,
            psm: 6,
            timeout: Duration::from_secs(120),
            pdftoppm: None,
            tesseract: None,
            scratch_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TesseractOcr {
    pdftoppm: PathBuf,
    tesseract: PathBuf,
    dpi: u32,
    psm: u8,
    timeout: Duration,
    scratch_dir: PathBuf,
}

impl TesseractOcr {
    /// Fails with [`TextSourceError::ToolMissing`] when either tool cannot be found.
    pub fn new(settings: &OcrSettings) -> Result<Self, TextSourceError> {
        Ok(Self {
            pdftoppm: locate(PDFTOPPM, settings.pdftoppm.as_deref())?,
            tesseract: locate(TESSERACT, settings.tesseract.as_deref())?,
            dpi: settings.dpi,
            psm: settings.psm,
            timeout: settings.timeout,
            scratch_dir: settings.scratch_dir.clone().unwrap_or_else(std::env::temp_dir),
        })
    }

    fn rasterize(&self, pdf: &Path, page: usize, image: &RasterImage) -> Result<(), TextSourceError> {
        let page = page.to_string();
        let mut cmd = Command::new(&self.pdftoppm);
        cmd.args(["-gray", "-r", &self.dpi.to_string(), "-f", &page, "-l", &page, "-singlefile", "-png"])
            .arg(pdf)
            .arg(image.prefix());
        run(PDFTOPPM, &mut cmd, self.timeout)?;
        Ok(())
    }
}

impl Ocr for TesseractOcr {
    fn recognize(&self, document: &dyn Document, index: usize) -> Result<String, TextSourceError> {
        let Some(pdf) = document.path() else {
            return Err(TextSourceError::NoRaster(document.name().to_string()));
        };
        let image = RasterImage::new_in(&self.scratch_dir)?;
        // pdftoppm numbers pages from 1
        self.rasterize(pdf, index + 1, &image)?;

        let mut cmd = Command::new(&self.tesseract);
        cmd.arg(image.path())
            .arg("stdout")
            .args(["--psm", &self.psm.to_string()]);
        let stdout = run(TESSERACT, &mut cmd, self.timeout)?;
        let text = String::from_utf8_lossy(&stdout).into_owned();
        debug!(page = index + 1, chars = text.len(), "OCR finished");
        Ok(text)
    }
}

fn locate(tool: &'static str, configured: Option<&Path>) -> Result<PathBuf, TextSourceError> {
    let found = match configured {
        Some(path) => which::which(path),
        None => which::which(tool),
    };
    found.map_err(|source| TextSourceError::ToolMissing { tool, source })
}

/// Uniquely named temporary PNG, removed when dropped
struct RasterImage {
    path: Option<TempPath>,
}

impl RasterImage {
    fn new_in(dir: &Path) -> Result<Self, TextSourceError> {
        let file = tempfile::Builder::new()
            .prefix("tally-page-")
            .suffix(".png")
            .tempfile_in(dir)?;
        Ok(Self {
            path: Some(file.into_temp_path()),
        })
    }

    fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    /// Output root handed to `pdftoppm -singlefile`, which appends `.png` itself.
    fn prefix(&self) -> PathBuf {
        self.path().with_extension("")
    }
}

impl Drop for RasterImage {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            let shown = path.display().to_string();
            if let Err(e) = path.close() {
                error!(path = %shown, error = %e, "failed to remove temporary page image");
            }
        }
    }
}

/// Run `cmd` to completion and return its stdout, killing it once `timeout` elapses.
fn run(tool: &'static str, cmd: &mut Command, timeout: Duration) -> Result<Vec<u8>, TextSourceError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| TextSourceError::Spawn { tool, source })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout = thread::spawn(move || drain(stdout));
    let stderr = thread::spawn(move || drain(stderr));

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                debug!(tool, error = %e, "kill after timeout failed");
            }
            child.wait()?;
            return Err(TextSourceError::Timeout {
                tool,
                secs: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();
    if !status.success() {
        return Err(TextSourceError::ToolFailed {
            tool,
            status: status.to_string(),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }
    Ok(stdout)
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(e) = pipe.read_to_end(&mut buf) {
            debug!(error = %e, "reading child output failed");
        }
    }
    buf
}
