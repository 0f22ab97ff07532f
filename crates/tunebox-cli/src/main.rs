//! Tunebox CLI - command prompt music player

mod cli;
mod completion;
mod console;
mod input;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ Context, Result };
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Args;
use completion::{ CommandCompleter, DirectoryCompleter };
use console::{ Console, Tone, BANNER };
use input::{ LineEditor, ReadOutcome };
use settings::{ expand_home, Settings };

use tunebox_core::{
    command,
    playlist::display_name,
    Command, DecoderCommand, Player, PlayerError, PlayerEvent, PlaylistTree,
};


const PROMPT: &str = "Command > ";
const ROOT_PROMPT: &str = "Root music path: ";


/// Formats a duration as `m:ss`.
fn format_time( time: Duration ) -> String {
    let secs = time.as_secs();
    format!( "{}:{:02}", secs / 60, secs % 60 )
}


/// Application state.
struct App {
    player: Player,
    console: Arc<Console>,
    should_quit: bool,
}


impl App {
    /// Creates the app and routes player events to the console.
    fn new( player: Player, console: Arc<Console> ) -> Self {
        let events_console = Arc::clone( &console );
        player.set_event_handler( move |event| match event {
            PlayerEvent::TrackStarted { path, offset } if offset.is_zero() => {
                events_console.log( Tone::Playing, &format!( "Playing {}...", display_name( path ) ) );
            }
            PlayerEvent::TrackStarted { path, offset } => {
                events_console.log(
                    Tone::Playing,
                    &format!( "Playing {} from {}...", display_name( path ), format_time( *offset ) ),
                );
            }
            PlayerEvent::TrackEnded { path } => {
                tracing::debug!( "Finished {:?}", path );
            }
            PlayerEvent::LaunchFailed { path, message } => {
                events_console.log(
                    Tone::Emphasize,
                    &format!( "Could not play {}: {}", display_name( path ), message ),
                );
            }
        });

        Self { player, console, should_quit: false }
    }


    fn execute_command( &mut self, input: &str ) {
        match Command::parse( input ) {
            Ok( cmd ) => {
                if let Err( e ) = self.run_command( cmd ) {
                    self.console.log( Tone::Emphasize, &e.to_string() );
                }
            }
            Err( e ) => {
                self.console.log( Tone::Emphasize, &e.to_string() );
            }
        }
    }


    fn run_command( &mut self, cmd: Command ) -> Result<(), PlayerError> {
        match cmd {
            Command::Use { name } => {
                let count = self.player.select_playlist( &name )?;
                let shown = if name.is_empty() { "all music" } else { name.as_str() };
                self.console.log(
                    Tone::State,
                    &format!( "Already switched to playlist: {} ({} tracks).", shown, count ),
                );
            }
            Command::Append { name } => {
                let added = self.player.append_playlist( &name )?;
                self.console.log( Tone::State, &format!( "Appended {} new tracks from {}.", added, name ) );
            }
            Command::Lists => {
                let names: Vec<&str> = self.player.tree().names().collect();
                self.console.log( Tone::Listing, &names.join( "\n" ) );
            }
            Command::Loop => {
                self.player.start_loop()?;
            }
            Command::Next => {
                self.player.play_next()?;
            }
            Command::Prev => {
                self.player.play_previous()?;
            }
            Command::Forward => {
                let elapsed = self.player.seek_forward()?;
                self.report_elapsed( elapsed );
            }
            Command::Backward => {
                let elapsed = self.player.seek_backward()?;
                self.report_elapsed( elapsed );
            }
            Command::Stop => {
                self.player.stop();
                self.console.log( Tone::State, "Stopped." );
            }
            Command::Status => {
                self.show_status();
            }
            Command::Watch => {
                self.show_listing( false );
            }
            Command::WatchAll => {
                self.show_listing( true );
            }
            Command::Help => {
                self.console.log( Tone::State, command::help_text() );
            }
            Command::Quit => {
                self.should_quit = true;
            }
        }
        Ok(())
    }


    fn report_elapsed( &self, elapsed: Option<Duration> ) {
        match elapsed {
            Some( elapsed ) => self.console.log( Tone::State, &format!( "Elapsed: {}", format_time( elapsed ) ) ),
            None => self.console.log( Tone::State, "Nothing is playing." ),
        }
    }


    fn show_status( &self ) {
        let Some( elapsed ) = self.player.elapsed() else {
            self.console.log( Tone::State, "Nothing is playing." );
            return;
        };

        let track = self.player.current_track()
            .map( |p| display_name( &p ) )
            .unwrap_or_default();
        let mode = if self.player.is_looping() { "looping" } else { "single" };

        self.console.log(
            Tone::Playing,
            &format!(
                "{} [{} / {}] {} ({})",
                track,
                self.player.current_index() + 1,
                self.player.tracks().len(),
                format_time( elapsed ),
                mode,
            ),
        );
    }


    fn show_listing( &self, full: bool ) {
        let listing = self.player.listing( full );

        if listing.entries.is_empty() {
            self.console.log( Tone::State, "The playlist is empty." );
            return;
        }

        for entry in &listing.entries {
            self.console.listing_entry( &entry.name, entry.playing );
        }
        if listing.truncated {
            self.console.log( Tone::Listing, "..." );
        }
    }
}


/// Installs the stderr log subscriber.
fn init_tracing( verbose: bool ) {
    let default = if verbose { "tunebox=debug,tunebox_core=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new( default ) ),
        )
        .with_writer( std::io::stderr )
        .init();
}


/// Works out the music root: command line, then settings, then the prompt.
///
/// @returns None if the operator closed the prompt
fn resolve_root( args: &Args, settings: &mut Settings, console: &Console ) -> Result<Option<PathBuf>> {
    if let Some( root ) = &args.root {
        return Ok( Some( root.clone() ) );
    }

    if !args.reconfigure {
        if let Some( root ) = settings.valid_root() {
            return Ok( Some( root.to_path_buf() ) );
        }

        let msg = match &settings.root_dir {
            Some( old ) => format!( "The music directory {} is gone, re-configuring...", old.display() ),
            None => "No music directory configured yet.".to_string(),
        };
        console.log( Tone::Emphasize, &msg );
    }

    let mut editor = LineEditor::new( console, ROOT_PROMPT );
    loop {
        let line = match editor.read_line( &DirectoryCompleter )? {
            ReadOutcome::Line( line ) => line,
            ReadOutcome::Interrupted => continue,
            ReadOutcome::Eof => return Ok( None ),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let path = expand_home( line );
        if path.is_dir() {
            settings.root_dir = Some( path.clone() );
            settings.save();
            return Ok( Some( path ) );
        }

        console.log(
            Tone::Emphasize,
            &format!( "The path {} is invalid, please choose another path", line ),
        );
    }
}


fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing( args.verbose );

    let console = Arc::new( Console::new() );
    console.log( Tone::Listing, BANNER );

    let mut settings = Settings::load();
    let Some( root ) = resolve_root( &args, &mut settings, &console )
        .context( "Failed to read the music directory" )?
    else {
        return Ok(());
    };

    let tree = PlaylistTree::build( &root )
        .with_context( || format!( "Failed to scan music directory {}", root.display() ) )?;

    let mut decoder: DecoderCommand = settings.decoder.clone().into();
    if let Some( program ) = args.decoder {
        decoder.program = program;
    }

    let mut app = App::new( Player::new( Arc::new( tree ), decoder ), Arc::clone( &console ) );
    let completer = CommandCompleter::new( app.player.tree().names().map( str::to_string ) );
    let mut editor = LineEditor::new( &console, PROMPT );

    // Main loop
    loop {
        match editor.read_line( &completer ).context( "Failed to read from terminal" )? {
            ReadOutcome::Line( line ) => {
                if !line.trim().is_empty() {
                    app.execute_command( &line );
                }
            }
            ReadOutcome::Interrupted => continue,
            ReadOutcome::Eof => break,
        }

        if app.should_quit {
            break;
        }
    }

    app.player.stop();
    Ok(())
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_format_time() {
        assert_eq!( format_time( Duration::ZERO ), "0:00" );
        assert_eq!( format_time( Duration::from_secs( 75 ) ), "1:15" );
        assert_eq!( format_time( Duration::from_millis( 3_599_900 ) ), "59:59" );
    }
}
