// ffmpeg transcoder: `ffmpeg <leading args> -i <input> <output>`

use std::ffi::OsString;
use std::path::Path;

use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::tools::{ExternalTool, Transcoder};

#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg: ExternalTool,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg: ExternalTool) -> Self {
        Self { ffmpeg }
    }

    pub fn from_config(tools: &ToolConfig) -> Self {
        Self::new(ExternalTool::new(
            &tools.ffmpeg_program,
            tools.ffmpeg_args.clone(),
        ))
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let args: Vec<OsString> = vec!["-i".into(), input.into(), output.into()];
        self.ffmpeg.run_producing(args, output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_transcode_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.mp3");
        fs::write(&input, b"RIFF").unwrap();
        // $0 is "-i"
        let fake = ExternalTool::new(
            "sh",
            vec!["-c".to_string(), r#"cp "$1" "$2""#.to_string()],
        );

        FfmpegTranscoder::new(fake).transcode(&input, &output).unwrap();
        assert_eq!(fs::read(&output).unwrap(), b"RIFF");
    }

    #[test]
    fn test_default_config_uses_quiet_overwrite_flags() {
        let transcoder = FfmpegTranscoder::from_config(&ToolConfig::default());
        assert_eq!(
            transcoder.ffmpeg,
            ExternalTool::new("ffmpeg", vec!["-v".into(), "0".into(), "-y".into()])
        );
    }
}
