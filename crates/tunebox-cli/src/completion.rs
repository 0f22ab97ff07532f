//! Tab completion sources for the prompt.

use std::fs;
use std::path::Path;

use tunebox_core::command::{ takes_playlist, COMMAND_NAMES };

use crate::settings::expand_home;


/// Replacement candidates for the end of a line.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub struct Completion {
    /// Byte offset where the completed word starts.
    pub start: usize,
    pub candidates: Vec<String>,
}


/// Something that can complete a partially typed line.
pub trait Completer {
    fn complete( &self, line: &str ) -> Completion;
}


/// Completes command keywords, then playlist names after `use`/`append`.
#[derive( Debug, Clone, Default )]
pub struct CommandCompleter {
    playlists: Vec<String>,
}


impl CommandCompleter {
    /// Creates a completer over the given playlist names.
    pub fn new( playlists: impl IntoIterator<Item = String> ) -> Self {
        Self { playlists: playlists.into_iter().collect() }
    }
}


impl Completer for CommandCompleter {
    fn complete( &self, line: &str ) -> Completion {
        match line.split_once( ' ' ) {
            None => Completion {
                start: 0,
                candidates: COMMAND_NAMES.iter()
                    .filter( |name| name.starts_with( line ) )
                    .map( |name| name.to_string() )
                    .collect(),
            },
            Some(( keyword, partial )) if takes_playlist( keyword ) => Completion {
                start: keyword.len() + 1,
                candidates: self.playlists.iter()
                    .filter( |name| name.starts_with( partial ) )
                    .cloned()
                    .collect(),
            },
            Some( _ ) => Completion::default(),
        }
    }
}


/// Completes directory paths, for the music root prompt.
#[derive( Debug, Clone, Copy, Default )]
pub struct DirectoryCompleter;


impl Completer for DirectoryCompleter {
    fn complete( &self, line: &str ) -> Completion {
        let ( dir_part, prefix ) = match line.rfind( '/' ) {
            Some( i ) => line.split_at( i + 1 ),
            None => ( "", line ),
        };

        let dir = if dir_part.is_empty() { Path::new( "." ).to_path_buf() } else { expand_home( dir_part ) };

        let Ok( entries ) = fs::read_dir( &dir ) else {
            return Completion::default();
        };

        let mut candidates: Vec<String> = entries
            .flatten()
            .filter( |entry| entry.path().is_dir() )
            .filter_map( |entry| entry.file_name().into_string().ok() )
            .filter( |name| name.starts_with( prefix ) )
            .filter( |name| !name.starts_with( '.' ) || prefix.starts_with( '.' ) )
            .map( |name| format!( "{}{}/", dir_part, name ) )
            .collect();
        candidates.sort();

        Completion { start: 0, candidates }
    }
}


#[cfg( test )]
mod tests {
    use super::*;

    use tempfile::tempdir;


    #[test]
    fn test_complete_command_keyword() {
        let completer = CommandCompleter::new( Vec::new() );

        let completion = completer.complete( "wa" );
        assert_eq!( completion.start, 0 );
        assert_eq!( completion.candidates, [ "watch", "watch-all" ] );

        assert_eq!( completer.complete( "lo" ).candidates, [ "loop" ] );
        assert!( completer.complete( "xyz" ).candidates.is_empty() );
    }


    #[test]
    fn test_complete_playlist_name() {
        let completer = CommandCompleter::new( vec![
            "Jazz".to_string(),
            "Rock".to_string(),
            "Rock Live".to_string(),
        ] );

        let completion = completer.complete( "use Ro" );
        assert_eq!( completion.start, 4 );
        assert_eq!( completion.candidates, [ "Rock", "Rock Live" ] );

        let completion = completer.complete( "app J" );
        assert_eq!( completion.candidates, [ "Jazz" ] );

        assert!( completer.complete( "next R" ).candidates.is_empty() );
    }


    #[test]
    fn test_complete_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all( dir.path().join( "Music" ) ).unwrap();
        fs::create_dir_all( dir.path().join( "Movies" ) ).unwrap();
        fs::write( dir.path().join( "Mixtape.mp3" ), b"" ).unwrap();

        let base = format!( "{}/", dir.path().display() );
        let completion = DirectoryCompleter.complete( &format!( "{}M", base ) );

        assert_eq!( completion.candidates, [
            format!( "{}Movies/", base ),
            format!( "{}Music/", base ),
        ] );
    }
}
