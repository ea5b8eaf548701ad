use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::{ConversionError, Converter, Result};
use crate::config::AppConfig;

static ERROR_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^ERROR:\s*(.+?)\s*$").ok());

/// Subset of the `--dump-single-json` report we care about
#[derive(Debug, Deserialize)]
struct Report {
    #[serde(default)]
    requested_downloads: Vec<RequestedDownload>,
}

#[derive(Debug, Deserialize)]
struct RequestedDownload {
    filepath: Option<String>,
}

/// Runs `yt-dlp` with ffmpeg audio extraction.
#[derive(Debug, Clone)]
pub struct YtDlpConverter {
    program: String,
    ffmpeg_location: Option<PathBuf>,
    audio_format: String,
    audio_quality: String,
}

impl YtDlpConverter {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            program: config.ytdlp_program.clone(),
            ffmpeg_location: config.ffmpeg_location.clone(),
            audio_format: config.audio_format.clone(),
            audio_quality: config.audio_quality.clone(),
        }
    }

    fn build_args(
        &self,
        source_url: &str,
        destination_folder: &Path,
        desired_name: Option<&str>,
    ) -> Vec<OsString> {
        let template = match desired_name {
            // Literal `%` in the name must not be read as a template field
            Some(name) => format!("{}.%(ext)s", name.replace('%', "%%")),
            None => "%(title)s.%(ext)s".to_string(),
        };

        let mut args: Vec<OsString> = vec![
            "--format".into(),
            "bestaudio/best".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            self.audio_format.clone().into(),
            "--audio-quality".into(),
            self.audio_quality.clone().into(),
            "--no-playlist".into(),
            "--no-simulate".into(),
            "--dump-single-json".into(),
            "--quiet".into(),
            "--no-warnings".into(),
            "--output".into(),
            destination_folder.join(template).into_os_string(),
        ];

        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.clone().into_os_string());
        }

        args.push(source_url.into());
        args
    }
}

impl Converter for YtDlpConverter {
    fn convert(
        &self,
        source_url: &str,
        destination_folder: &Path,
        desired_name: Option<&str>,
    ) -> Result<String> {
        let args = self.build_args(source_url, destination_folder, desired_name);
        tracing::debug!("[convert] {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ConversionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConversionError::Failed(failure_reason(
                &stderr,
                &output.status.to_string(),
            )));
        }

        let file_name = file_name_from_report(&String::from_utf8_lossy(&output.stdout))?;
        tracing::info!("[convert] finished {} -> {}", source_url, file_name);
        Ok(file_name)
    }
}

/// Extract the final file name from the JSON report printed after post-processing.
fn file_name_from_report(stdout: &str) -> Result<String> {
    let json_line = stdout
        .lines()
        .rev()
        .find(|line| line.trim_start().starts_with('{'))
        .ok_or(ConversionError::NoOutput)?;

    let report: Report = serde_json::from_str(json_line)
        .map_err(|e| ConversionError::InvalidReport(e.to_string()))?;

    report
        .requested_downloads
        .into_iter()
        .find_map(|download| download.filepath)
        .and_then(|path| {
            Path::new(&path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .ok_or(ConversionError::NoOutput)
}

/// The most useful line of a failed run: the last `ERROR:` line, else the last
/// non-empty line, else the exit status.
fn failure_reason(stderr: &str, status: &str) -> String {
    if let Some(re) = ERROR_LINE.as_ref() {
        if let Some(caps) = re.captures_iter(stderr).last() {
            return caps[1].to_string();
        }
    }

    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("yt-dlp exited with {}", status))
}
