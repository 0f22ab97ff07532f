//! Command-line argument parsing for Tunebox.

use std::path::PathBuf;

use clap::Parser;


/// Tunebox - a filesystem-based command prompt music player.
#[derive( Parser, Debug )]
#[command( name = "tunebox" )]
#[command( version, about, long_about = None )]
pub struct Args {
    /// Music root directory (overrides the saved one for this run).
    #[arg( short, long )]
    pub root: Option<PathBuf>,

    /// Decoder program to run instead of the configured one.
    #[arg( short, long )]
    pub decoder: Option<String>,

    /// Ask for the music root directory even if one is saved.
    #[arg( long )]
    pub reconfigure: bool,

    /// Log debug output to stderr.
    #[arg( short, long )]
    pub verbose: bool,
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_parse_args() {
        let args = Args::parse_from( [ "tunebox", "--root", "/music", "-d", "mpv", "-v" ] );
        assert_eq!( args.root, Some( PathBuf::from( "/music" ) ) );
        assert_eq!( args.decoder.as_deref(), Some( "mpv" ) );
        assert!( args.verbose );
        assert!( !args.reconfigure );
    }
}
