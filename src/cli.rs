//! CLI argument parsing with clap.

use clap::Parser;

/// Generate a talking video from a portrait image.
#[derive(Parser, Debug)]
#[command(name = "portrait-to-talking", version, about)]
pub struct Cli {
    /// Portrait image path or URL.
    pub image: String,

    /// Audio file path or URL (a silent video is generated without it).
    #[arg(short, long)]
    pub audio: Option<String>,

    /// Generate a silent video, ignoring --audio.
    #[arg(long)]
    pub silent: bool,

    /// Output video file path.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Face crop dilation ratio.
    #[arg(long, default_value_t = 2.0)]
    pub face_crop_ratio: f64,

    /// Output video height.
    #[arg(long, default_value_t = 256)]
    pub height: u32,

    /// Output video width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Extra backend option as KEY=VALUE (repeatable).
    #[arg(short = 'x', long = "extra", value_name = "KEY=VALUE")]
    pub extra: Vec<String>,

    /// EchoMimic service URL (default: ECHOMIMIC_URL or config file).
    #[arg(long)]
    pub echomimic_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Audio to send, honoring `--silent`.
    pub fn effective_audio(&self) -> Option<&str> {
        if self.silent {
            None
        } else {
            self.audio.as_deref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cli = Cli::parse_from(["portrait-to-talking", "face.jpg"]);
        assert_eq!(cli.image, "face.jpg");
        assert!(cli.audio.is_none());
        assert!(!cli.silent);
        assert!(cli.output.is_none());
        assert!((cli.face_crop_ratio - 2.0).abs() < f64::EPSILON);
        assert_eq!(cli.height, 256);
        assert!(cli.width.is_none());
        assert!(cli.extra.is_empty());
        assert!(cli.echomimic_url.is_none());
        assert!(cli.timeout.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn all_options() {
        let cli = Cli::parse_from([
            "portrait-to-talking",
            "-a",
            "speech.wav",
            "-o",
            "out.mp4",
            "--face-crop-ratio",
            "1.5",
            "--height",
            "512",
            "--width",
            "384",
            "-x",
            "steps=30",
            "--extra",
            "fps=25",
            "--echomimic-url",
            "http://gpu:8000/a2v",
            "--timeout",
            "60",
            "-v",
            "face.jpg",
        ]);
        assert_eq!(cli.effective_audio(), Some("speech.wav"));
        assert_eq!(cli.output.as_deref(), Some("out.mp4"));
        assert!((cli.face_crop_ratio - 1.5).abs() < f64::EPSILON);
        assert_eq!(cli.height, 512);
        assert_eq!(cli.width, Some(384));
        assert_eq!(cli.extra, vec!["steps=30", "fps=25"]);
        assert_eq!(cli.echomimic_url.as_deref(), Some("http://gpu:8000/a2v"));
        assert_eq!(cli.timeout, Some(60));
        assert!(cli.verbose);
    }

    #[test]
    fn silent_drops_audio() {
        let cli = Cli::parse_from(["portrait-to-talking", "--silent", "-a", "speech.wav", "face.jpg"]);
        assert!(cli.effective_audio().is_none());
    }

    #[test]
    fn missing_image_errors() {
        assert!(Cli::try_parse_from(["portrait-to-talking"]).is_err());
    }
}
