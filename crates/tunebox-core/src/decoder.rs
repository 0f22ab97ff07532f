//! External decoder process
//!
//! Audio is produced by a separate program (ffplay by default). This module
//! only knows how to build its command line and launch it with detached
//! standard streams.

use std::ffi::OsString;
use std::path::Path;
use std::process::{ Child, Command, Stdio };
use std::time::Duration;


/// How to invoke the external decoder.
///
/// The command line is `program [args...] [offset_flag SECONDS] PATH`; the
/// offset pair is left out when starting from the beginning.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct DecoderCommand {
    pub program: String,
    pub args: Vec<String>,
    pub offset_flag: Option<String>,
}


impl Default for DecoderCommand {
    fn default() -> Self {
        Self {
            program: "ffplay".to_string(),
            args: vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
            ],
            offset_flag: Some( "-ss".to_string() ),
        }
    }
}


impl DecoderCommand {
    /// Creates a decoder command with no extra arguments.
    pub fn new( program: impl Into<String> ) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            offset_flag: None,
        }
    }


    /// Lists the arguments passed for a given file and start offset.
    ///
    /// The path is passed through as raw OS bytes, so file names that are
    /// not valid UTF-8 still reach the decoder intact.
    pub fn arguments( &self, path: &Path, offset: Duration ) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.args.iter().map( OsString::from ).collect();

        if let Some( flag ) = &self.offset_flag {
            if !offset.is_zero() {
                args.push( flag.into() );
                args.push( format_offset( offset ).into() );
            }
        }

        args.push( path.as_os_str().to_os_string() );
        args
    }


    /// Launches the decoder for `path`, starting `offset` into the file.
    pub fn spawn( &self, path: &Path, offset: Duration ) -> std::io::Result<Child> {
        Command::new( &self.program )
            .args( self.arguments( path, offset ) )
            .stdin( Stdio::null() )
            .stdout( Stdio::null() )
            .stderr( Stdio::null() )
            .spawn()
    }
}


/// Formats an offset as decimal seconds with millisecond precision.
fn format_offset( offset: Duration ) -> String {
    format!( "{:.3}", offset.as_secs_f64() )
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_default_is_ffplay() {
        let decoder = DecoderCommand::default();
        assert_eq!( decoder.program, "ffplay" );
        assert_eq!(
            decoder.arguments( Path::new( "/music/a.mp3" ), Duration::ZERO ),
            [ "-nodisp", "-autoexit", "-loglevel", "quiet", "/music/a.mp3" ]
        );
    }


    #[test]
    fn test_offset_flag() {
        let decoder = DecoderCommand::default();
        let args = decoder.arguments( Path::new( "/music/a.mp3" ), Duration::from_millis( 12_500 ) );
        assert_eq!( &args[ 4.. ], [ "-ss", "12.500", "/music/a.mp3" ] );
    }


    #[test]
    fn test_offset_dropped_without_flag() {
        let decoder = DecoderCommand::new( "mpg123" );
        let args = decoder.arguments( Path::new( "/music/a.mp3" ), Duration::from_secs( 30 ) );
        assert_eq!( args, [ "/music/a.mp3" ] );
    }


    #[cfg( unix )]
    #[test]
    fn test_non_utf8_path_kept_intact() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new( "/music" ).join( OsStr::from_bytes( b"caf\xe9.mp3" ) );
        let args = DecoderCommand::new( "ffplay" ).arguments( &path, Duration::ZERO );

        assert_eq!( args.len(), 1 );
        assert_eq!( args[ 0 ].as_bytes(), b"/music/caf\xe9.mp3" );
    }


    #[test]
    fn test_spawn_missing_program() {
        let decoder = DecoderCommand::new( "tunebox-no-such-decoder" );
        assert!( decoder.spawn( Path::new( "/music/a.mp3" ), Duration::ZERO ).is_err() );
    }
}
