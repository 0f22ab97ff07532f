//! Prompt command parsing.
//!
//! Commands are typed at the prompt as a keyword followed by at most one
//! argument, a playlist name that runs to the end of the line.

use thiserror::Error;


/// Errors that can occur during command parsing.
#[derive( Debug, Error, PartialEq, Eq )]
pub enum CommandError {
    #[error( "Invalid command: {0}" )]
    Unknown( String ),

    #[error( "Missing argument: {0}" )]
    MissingArgument( String ),

    #[error( "Unexpected argument for {command}: {argument}" )]
    UnexpectedArgument { command: String, argument: String },
}


/// Parsed prompt command.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum Command {
    // Playlist commands
    Use { name: String },
    Append { name: String },
    Lists,

    // Playback commands
    Loop,
    Next,
    Prev,
    Forward,
    Backward,
    Stop,
    Status,

    // Listing commands
    Watch,
    WatchAll,

    Help,
    Quit,
}


/// Command keywords offered by tab completion, in help order.
pub const COMMAND_NAMES: &[&str] = &[
    "use", "append", "lists", "loop", "next", "prev", "forward", "backward",
    "stop", "status", "watch", "watch-all", "help", "quit",
];


/// Returns true if the keyword takes a playlist name argument.
pub fn takes_playlist( keyword: &str ) -> bool {
    matches!( keyword, "use" | "append" | "app" )
}


impl Command {
    /// Parses a command line.
    ///
    /// @param input - The line typed at the prompt
    ///
    /// @returns The parsed command or an error
    pub fn parse( input: &str ) -> Result<Self, CommandError> {
        let input = input.trim_start();
        let ( keyword, args ) = match input.split_once( ' ' ) {
            Some(( keyword, rest )) => ( keyword, Some( rest.trim() ) ),
            None => ( input.trim_end(), None ),
        };

        let playlist_name = || {
            args.map( str::to_string )
                .ok_or_else( || CommandError::MissingArgument( "playlist name".into() ) )
        };

        let command = match keyword {
            "use" => Command::Use { name: playlist_name()? },
            "append" | "app" => Command::Append { name: playlist_name()? },
            "lists" | "ls" => Command::Lists,
            "loop" => Command::Loop,
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "forward" | "f" => Command::Forward,
            "backward" | "b" => Command::Backward,
            "stop" => Command::Stop,
            "status" | "st" => Command::Status,
            "watch" | "w" => Command::Watch,
            "watch-all" | "wa" => Command::WatchAll,
            "help" | "h" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,

            "" => return Err( CommandError::Unknown( "empty command".into() ) ),
            other => return Err( CommandError::Unknown( other.to_string() ) ),
        };

        if !takes_playlist( keyword ) {
            if let Some( argument ) = args.filter( |a| !a.is_empty() ) {
                return Err( CommandError::UnexpectedArgument {
                    command: keyword.to_string(),
                    argument: argument.to_string(),
                });
            }
        }

        Ok( command )
    }
}


/// Returns help text listing all available commands.
pub fn help_text() -> &'static str {
    r#"A simple filesystem-based music player.

Every directory under the music root is a playlist. Selecting one adds
every track below it, recursively: given

  Music/
    Rock/
      1.mp3
      2.mp3
      Live/
        3.mp3

`use Rock` plays 1.mp3, 2.mp3 and 3.mp3, in that order.

Playlist Commands:
  use <playlist>       Switch to a playlist (`use ` alone picks everything)
  append <playlist>    Append a playlist to the current one    [app]
  lists                Show playlist names                     [ls]

Playback Commands:
  loop                 Loop the selected playlist
  next                 Play the next track                     [n]
  prev                 Play the previous track                 [p]
  forward              Skip ahead 10 seconds                   [f]
  backward             Skip back 10 seconds                    [b]
  stop                 Stop playback
  status               Show the current track and time         [st]

Listing Commands:
  watch                Show part of the playlist               [w]
  watch-all            Show the whole playlist                 [wa]

Other Commands:
  help                 Show this help                          [h]
  quit                 Exit tunebox                            [q]"#
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_parse_use() {
        let cmd = Command::parse( "use Rock" ).unwrap();
        assert_eq!( cmd, Command::Use { name: "Rock".into() } );
    }


    #[test]
    fn test_parse_use_name_with_spaces() {
        let cmd = Command::parse( "use  Best of 1999 " ).unwrap();
        assert_eq!( cmd, Command::Use { name: "Best of 1999".into() } );
    }


    #[test]
    fn test_parse_use_empty_name_selects_root() {
        let cmd = Command::parse( "use " ).unwrap();
        assert_eq!( cmd, Command::Use { name: String::new() } );
    }


    #[test]
    fn test_parse_append_alias() {
        let cmd = Command::parse( "app Jazz" ).unwrap();
        assert_eq!( cmd, Command::Append { name: "Jazz".into() } );
    }


    #[test]
    fn test_parse_aliases() {
        assert_eq!( Command::parse( "n" ).unwrap(), Command::Next );
        assert_eq!( Command::parse( "p" ).unwrap(), Command::Prev );
        assert_eq!( Command::parse( "wa" ).unwrap(), Command::WatchAll );
        assert_eq!( Command::parse( "w" ).unwrap(), Command::Watch );
        assert_eq!( Command::parse( "forward" ).unwrap(), Command::Forward );
        assert_eq!( Command::parse( "b" ).unwrap(), Command::Backward );
        assert_eq!( Command::parse( "  loop  " ).unwrap(), Command::Loop );
    }


    #[test]
    fn test_parse_missing_arg() {
        let result = Command::parse( "use" );
        assert!( matches!( result, Err( CommandError::MissingArgument( _ ) ) ) );
    }


    #[test]
    fn test_parse_unexpected_arg() {
        let result = Command::parse( "next Rock" );
        assert!( matches!( result, Err( CommandError::UnexpectedArgument { .. } ) ) );
    }


    #[test]
    fn test_parse_unknown() {
        assert!( matches!( Command::parse( "foobar" ), Err( CommandError::Unknown( _ ) ) ) );
        assert!( matches!( Command::parse( "" ), Err( CommandError::Unknown( _ ) ) ) );
    }


    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for name in COMMAND_NAMES {
            assert!(
                help.lines().any( |line| line.trim_start().starts_with( &format!( "{} ", name ) ) ),
                "help is missing {}", name
            );
        }
    }


    #[test]
    fn test_completion_names_parse() {
        for name in COMMAND_NAMES {
            let line = if takes_playlist( name ) { format!( "{} x", name ) } else { name.to_string() };
            assert!( Command::parse( &line ).is_ok(), "{} should parse", name );
        }
    }
}
