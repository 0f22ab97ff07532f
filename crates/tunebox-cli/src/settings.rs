//! Application settings management
//!
//! Persists the music root directory and the decoder invocation.

use std::fs;
use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };
use tunebox_core::DecoderCommand;


/// Decoder program and arguments.
#[derive( Debug, Clone, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default )]
pub struct DecoderSettings {
    /// Executable to run, looked up on PATH
    pub program: String,

    /// Arguments placed before the offset and file path
    pub args: Vec<String>,

    /// Flag introducing the start offset in seconds, if the program has one
    pub offset_flag: Option<String>,
}


impl Default for DecoderSettings {
    fn default() -> Self {
        let decoder = DecoderCommand::default();
        Self {
            program: decoder.program,
            args: decoder.args,
            offset_flag: decoder.offset_flag,
        }
    }
}


impl From<DecoderSettings> for DecoderCommand {
    fn from( settings: DecoderSettings ) -> Self {
        DecoderCommand {
            program: settings.program,
            args: settings.args,
            offset_flag: settings.offset_flag,
        }
    }
}


/// Application settings.
#[derive( Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default )]
pub struct Settings {
    /// Root music directory
    pub root_dir: Option<PathBuf>,

    /// External decoder
    pub decoder: DecoderSettings,
}


impl Settings {
    /// Returns the path to the settings file.
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map( |p| p.join( "tunebox" ).join( "settings.json" ) )
    }


    /// Loads settings from disk, or returns defaults if not found.
    pub fn load() -> Self {
        match Self::settings_path() {
            Some( path ) => Self::load_from( &path ),
            None => Self::default(),
        }
    }


    /// Loads settings from a specific file.
    pub fn load_from( path: &Path ) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string( path ) {
            Ok( contents ) => {
                serde_json::from_str( &contents ).unwrap_or_else( |e| {
                    tracing::warn!( "Ignoring malformed settings {:?}: {}", path, e );
                    Self::default()
                })
            }
            Err( e ) => {
                tracing::warn!( "Failed to read settings: {}", e );
                Self::default()
            }
        }
    }


    /// Saves settings to disk.
    pub fn save( &self ) {
        if let Some( path ) = Self::settings_path() {
            self.save_to( &path );
        }
    }


    /// Saves settings to a specific file.
    pub fn save_to( &self, path: &Path ) {
        // Create parent directory if needed
        if let Some( parent ) = path.parent() {
            if !parent.exists() {
                if let Err( e ) = fs::create_dir_all( parent ) {
                    tracing::warn!( "Failed to create settings directory: {}", e );
                    return;
                }
            }
        }

        match serde_json::to_string_pretty( self ) {
            Ok( json ) => {
                if let Err( e ) = fs::write( path, json ) {
                    tracing::warn!( "Failed to save settings: {}", e );
                }
            }
            Err( e ) => {
                tracing::warn!( "Failed to serialize settings: {}", e );
            }
        }
    }


    /// Gets the configured root directory if it still exists.
    pub fn valid_root( &self ) -> Option<&Path> {
        self.root_dir.as_deref().filter( |p| p.is_dir() )
    }
}


/// Expands a leading `~` to the home directory.
pub fn expand_home( input: &str ) -> PathBuf {
    let home = dirs::home_dir();

    match ( input.strip_prefix( '~' ), home ) {
        ( Some( rest ), Some( home ) ) if rest.is_empty() || rest.starts_with( '/' ) => {
            home.join( rest.trim_start_matches( '/' ) )
        }
        _ => PathBuf::from( input ),
    }
}


#[cfg( test )]
mod tests {
    use super::*;

    use tempfile::tempdir;


    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from( &dir.path().join( "settings.json" ) );
        assert_eq!( settings, Settings::default() );
        assert_eq!( settings.decoder.program, "ffplay" );
    }


    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join( "nested" ).join( "settings.json" );

        let settings = Settings {
            root_dir: Some( dir.path().to_path_buf() ),
            decoder: DecoderSettings {
                program: "mpv".into(),
                args: vec![ "--no-video".into() ],
                offset_flag: Some( "--start".into() ),
            },
        };
        settings.save_to( &path );

        let loaded = Settings::load_from( &path );
        assert_eq!( loaded, settings );
        assert_eq!( loaded.valid_root(), Some( dir.path() ) );
    }


    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join( "settings.json" );
        fs::write( &path, r#"{ "root_dir": "/nowhere/at/all" }"# ).unwrap();

        let settings = Settings::load_from( &path );
        assert_eq!( settings.root_dir, Some( PathBuf::from( "/nowhere/at/all" ) ) );
        assert_eq!( settings.decoder, DecoderSettings::default() );
        assert_eq!( settings.valid_root(), None );
    }


    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join( "settings.json" );
        fs::write( &path, "not json" ).unwrap();

        assert_eq!( Settings::load_from( &path ), Settings::default() );
    }


    #[test]
    fn test_decoder_conversion() {
        let command: DecoderCommand = DecoderSettings::default().into();
        assert_eq!( command, DecoderCommand::default() );
    }


    #[test]
    fn test_expand_home() {
        assert_eq!( expand_home( "/music" ), PathBuf::from( "/music" ) );
        assert_eq!( expand_home( "~user/music" ), PathBuf::from( "~user/music" ) );
        if let Some( home ) = dirs::home_dir() {
            assert_eq!( expand_home( "~/music" ), home.join( "music" ) );
            assert_eq!( expand_home( "~" ), home );
        }
    }
}
