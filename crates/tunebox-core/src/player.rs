//! Core player implementation
//!
//! The Player owns the active playlist and drives one external decoder
//! process at a time. Each play attempt gets a watcher thread that waits for
//! the process and, in loop mode, moves on to the next track when the
//! current one finishes on its own.

use std::path::{ Path, PathBuf };
use std::sync::Arc;
use std::sync::atomic::{ AtomicBool, AtomicU8, Ordering };
use std::thread;
use std::time::{ Duration, Instant };

use parking_lot::{ Mutex, RwLock };
use thiserror::Error;

use crate::decoder::DecoderCommand;
use crate::playlist::{ Direction, Listing, Playlist };
use crate::tree::{ PlaylistTree, TreeError };


/// Time skipped by one forward/backward seek.
pub const SEEK_STEP: Duration = Duration::from_secs( 10 );

/// How often a watcher thread checks its process.
const WATCH_INTERVAL: Duration = Duration::from_millis( 20 );


/// Errors that can occur during playback.
#[derive( Debug, Error )]
pub enum PlayerError {
    #[error( transparent )]
    Tree( #[from] TreeError ),

    #[error( "Failed to launch {program}: {source}" )]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error( "No playlist selected, try `use <playlist>` first" )]
    EmptyPlaylist,
}


/// Events emitted by the player for console updates.
#[derive( Debug, Clone )]
pub enum PlayerEvent {
    TrackStarted { path: PathBuf, offset: Duration },
    TrackEnded { path: PathBuf },
    LaunchFailed { path: PathBuf, message: String },
}


type EventHandler = Box<dyn Fn( &PlayerEvent ) + Send + Sync>;


/// Lifecycle of a single decoder process.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
#[repr( u8 )]
pub enum AttemptState {
    Running = 0,
    KilledByUser = 1,
    ExitedNaturally = 2,
    Failed = 3,
}


impl AttemptState {
    fn from_u8( value: u8 ) -> Self {
        match value {
            0 => AttemptState::Running,
            1 => AttemptState::KilledByUser,
            2 => AttemptState::ExitedNaturally,
            _ => AttemptState::Failed,
        }
    }
}


/// Shared between the player and one watcher thread.
#[derive( Debug )]
struct PlayAttempt {
    state: AtomicU8,
}


impl PlayAttempt {
    fn new() -> Self {
        Self { state: AtomicU8::new( AttemptState::Running as u8 ) }
    }


    fn state( &self ) -> AttemptState {
        AttemptState::from_u8( self.state.load( Ordering::Acquire ) )
    }


    /// Leaves `Running`. Only the first transition wins.
    fn finish( &self, to: AttemptState ) -> bool {
        self.state
            .compare_exchange(
                AttemptState::Running as u8,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}


/// The running decoder, as seen from the player.
struct PlaybackHandle {
    attempt: Arc<PlayAttempt>,
    thread: Option<thread::JoinHandle<()>>,
}


/// Elapsed-time bookkeeping across seek restarts.
#[derive( Debug )]
struct PlaybackClock {
    epoch: Instant,
    seek_steps: i64,
}


impl PlaybackClock {
    fn new() -> Self {
        Self { epoch: Instant::now(), seek_steps: 0 }
    }


    fn reset( &mut self ) {
        *self = Self::new();
    }


    fn elapsed( &self ) -> Duration {
        let secs = self.epoch.elapsed().as_secs_f64()
            + self.seek_steps as f64 * SEEK_STEP.as_secs_f64();
        Duration::from_secs_f64( secs.max( 0.0 ) )
    }
}


/// State shared by the player and its watcher threads.
///
/// Lock order: `playback`, then `playlist`, then `clock`.
struct Shared {
    tree: Arc<PlaylistTree>,
    decoder: DecoderCommand,
    playlist: Mutex<Playlist>,
    looping: AtomicBool,
    playback: Mutex<Option<PlaybackHandle>>,
    clock: Mutex<PlaybackClock>,
    events: RwLock<Option<EventHandler>>,
}


impl Shared {
    fn emit( &self, event: PlayerEvent ) {
        if let Some( handler ) = self.events.read().as_ref() {
            handler( &event );
        }
    }


    /// Spawns the decoder and its watcher thread.
    fn launch(
        shared: &Arc<Shared>,
        path: &Path,
        offset: Duration,
    ) -> Result<PlaybackHandle, PlayerError> {
        let child = shared.decoder.spawn( path, offset ).map_err( |source| PlayerError::Launch {
            program: shared.decoder.program.clone(),
            source,
        })?;

        tracing::info!( "Playing: {:?} from {:.1}s", path, offset.as_secs_f64() );

        let attempt = Arc::new( PlayAttempt::new() );
        let attempt_clone = Arc::clone( &attempt );
        let shared_clone = Arc::clone( shared );
        let path_clone = path.to_path_buf();

        let thread = thread::spawn( move || {
            Shared::watch( shared_clone, child, attempt_clone, path_clone );
        });

        shared.emit( PlayerEvent::TrackStarted { path: path.to_path_buf(), offset } );

        Ok( PlaybackHandle { attempt, thread: Some( thread ) } )
    }


    /// Installs a new handle. A handle still in the slot is told to die;
    /// its watcher reaps the process on its own.
    fn install( slot: &mut Option<PlaybackHandle>, handle: PlaybackHandle ) {
        if let Some( old ) = slot.replace( handle ) {
            old.attempt.finish( AttemptState::KilledByUser );
        }
    }


    /// Body of a watcher thread.
    fn watch(
        shared: Arc<Shared>,
        mut child: std::process::Child,
        attempt: Arc<PlayAttempt>,
        path: PathBuf,
    ) {
        let success = loop {
            if attempt.state() == AttemptState::KilledByUser {
                if let Err( e ) = child.kill() {
                    tracing::debug!( "Kill failed, decoder already gone: {}", e );
                }
                let _ = child.wait();
                tracing::debug!( "Watcher: decoder killed" );
                return;
            }

            match child.try_wait() {
                Ok( Some( status ) ) => break status.success(),
                Ok( None ) => thread::sleep( WATCH_INTERVAL ),
                Err( e ) => {
                    tracing::warn!( "Failed to wait for decoder: {}", e );
                    let _ = child.kill();
                    let _ = child.wait();
                    break false;
                }
            }
        };

        let outcome = if success { AttemptState::ExitedNaturally } else { AttemptState::Failed };
        if !attempt.finish( outcome ) {
            // Stopped while the process was exiting.
            return;
        }

        let mut playback = shared.playback.lock();
        let is_current = playback.as_ref()
            .map( |h| Arc::ptr_eq( &h.attempt, &attempt ) )
            .unwrap_or( false );
        if !is_current {
            tracing::debug!( "Watcher: superseded, not advancing" );
            return;
        }

        if outcome == AttemptState::Failed {
            tracing::warn!( "Decoder exited abnormally on {:?}", path );
            shared.looping.store( false, Ordering::Release );
            *playback = None;
            return;
        }

        shared.emit( PlayerEvent::TrackEnded { path } );

        if !shared.looping.load( Ordering::Acquire ) {
            *playback = None;
            return;
        }

        let next = shared.playlist.lock().advance( Direction::Next ).map( Path::to_path_buf );
        let Some( next ) = next else {
            *playback = None;
            return;
        };

        shared.clock.lock().reset();

        match Shared::launch( &shared, &next, Duration::ZERO ) {
            Ok( handle ) => Shared::install( &mut playback, handle ),
            Err( e ) => {
                tracing::error!( "Auto-advance failed: {}", e );
                shared.looping.store( false, Ordering::Release );
                *playback = None;
                shared.emit( PlayerEvent::LaunchFailed { path: next, message: e.to_string() } );
            }
        }
    }
}


/// Playback engine: active playlist, loop mode and the decoder process.
pub struct Player {
    shared: Arc<Shared>,
}


impl Player {
    /// Creates a player over a scanned tree.
    pub fn new( tree: Arc<PlaylistTree>, decoder: DecoderCommand ) -> Self {
        Self {
            shared: Arc::new( Shared {
                tree,
                decoder,
                playlist: Mutex::new( Playlist::new() ),
                looping: AtomicBool::new( false ),
                playback: Mutex::new( None ),
                clock: Mutex::new( PlaybackClock::new() ),
                events: RwLock::new( None ),
            }),
        }
    }


    /// Registers a callback for player events.
    ///
    /// The callback may run on a watcher thread while player state is
    /// locked; it must not call back into the player.
    pub fn set_event_handler( &self, handler: impl Fn( &PlayerEvent ) + Send + Sync + 'static ) {
        *self.shared.events.write() = Some( Box::new( handler ) );
    }


    /// Gets the playlist tree.
    pub fn tree( &self ) -> &PlaylistTree {
        &self.shared.tree
    }


    /// Switches to the playlist called `name`.
    ///
    /// A name that does not resolve leaves everything untouched.
    ///
    /// @returns The number of tracks in the new playlist
    pub fn select_playlist( &self, name: &str ) -> Result<usize, PlayerError> {
        let tracks = self.shared.tree.tracks( name )?;
        let count = tracks.len();

        self.stop();
        self.shared.playlist.lock().replace( tracks );

        tracing::info!( "Switched to playlist {:?} ({} tracks)", name, count );
        Ok( count )
    }


    /// Appends the playlist called `name` without interrupting playback.
    ///
    /// @returns The number of tracks that were new
    pub fn append_playlist( &self, name: &str ) -> Result<usize, PlayerError> {
        let tracks = self.shared.tree.tracks( name )?;
        let added = self.shared.playlist.lock().append( tracks );

        tracing::info!( "Appended playlist {:?} ({} new tracks)", name, added );
        Ok( added )
    }


    /// Starts looping over the playlist from the current track.
    pub fn start_loop( &self ) -> Result<(), PlayerError> {
        self.kill_current();

        if self.shared.playlist.lock().is_empty() {
            return Err( PlayerError::EmptyPlaylist );
        }

        self.shared.looping.store( true, Ordering::Release );
        self.shared.clock.lock().reset();
        self.begin_current( Duration::ZERO )
    }


    /// Moves one track forward or back, wrapping around, and plays it.
    pub fn advance( &self, direction: Direction ) -> Result<(), PlayerError> {
        self.kill_current();

        {
            let mut playlist = self.shared.playlist.lock();
            if playlist.is_empty() {
                return Err( PlayerError::EmptyPlaylist );
            }
            playlist.advance( direction );
        }

        self.start_loop()
    }


    /// Plays the next track.
    pub fn play_next( &self ) -> Result<(), PlayerError> {
        self.advance( Direction::Next )
    }


    /// Plays the previous track.
    pub fn play_previous( &self ) -> Result<(), PlayerError> {
        self.advance( Direction::Prev )
    }


    /// Skips `SEEK_STEP` ahead in the current track.
    ///
    /// @returns The new elapsed time, or None when nothing is playing
    pub fn seek_forward( &self ) -> Result<Option<Duration>, PlayerError> {
        self.seek( Direction::Next )
    }


    /// Skips `SEEK_STEP` back in the current track, stopping at its start.
    ///
    /// @returns The new elapsed time, or None when nothing is playing
    pub fn seek_backward( &self ) -> Result<Option<Duration>, PlayerError> {
        self.seek( Direction::Prev )
    }


    /// Restarts the decoder on the current track at a shifted offset.
    fn seek( &self, direction: Direction ) -> Result<Option<Duration>, PlayerError> {
        let Some( elapsed ) = self.elapsed() else {
            return Ok( None );
        };

        self.kill_current();

        let offset = {
            let mut clock = self.shared.clock.lock();
            match direction {
                Direction::Next => {
                    clock.seek_steps += 1;
                    elapsed + SEEK_STEP
                }
                Direction::Prev if elapsed >= SEEK_STEP => {
                    clock.seek_steps -= 1;
                    elapsed - SEEK_STEP
                }
                Direction::Prev => {
                    clock.reset();
                    Duration::ZERO
                }
            }
        };

        tracing::info!( "Seeking to {:.1}s", offset.as_secs_f64() );
        self.begin_current( offset )?;
        Ok( self.elapsed() )
    }


    /// Stops playback and leaves loop mode. Safe to call at any time.
    pub fn stop( &self ) {
        self.shared.looping.store( false, Ordering::Release );
        if self.kill_current() {
            tracing::info!( "Stopped" );
        }
    }


    /// Kills the running decoder, if any, and waits for its watcher.
    ///
    /// @returns true if something was playing
    fn kill_current( &self ) -> bool {
        let handle = self.shared.playback.lock().take();

        let Some( mut handle ) = handle else {
            return false;
        };

        handle.attempt.finish( AttemptState::KilledByUser );
        if let Some( thread ) = handle.thread.take() {
            let _ = thread.join();
        }
        true
    }


    /// Launches the decoder on the current track.
    fn begin_current( &self, offset: Duration ) -> Result<(), PlayerError> {
        let mut playback = self.shared.playback.lock();

        let path = self.shared.playlist.lock()
            .current()
            .map( Path::to_path_buf )
            .ok_or( PlayerError::EmptyPlaylist )?;

        match Shared::launch( &self.shared, &path, offset ) {
            Ok( handle ) => {
                Shared::install( &mut playback, handle );
                Ok(())
            }
            Err( e ) => {
                self.shared.looping.store( false, Ordering::Release );
                Err( e )
            }
        }
    }


    /// Returns true while a decoder process is alive.
    pub fn is_playing( &self ) -> bool {
        self.shared.playback.lock().is_some()
    }


    /// Returns true while loop mode is on.
    pub fn is_looping( &self ) -> bool {
        self.shared.looping.load( Ordering::Acquire )
    }


    /// Gets the elapsed time in the current track, or None when not playing.
    pub fn elapsed( &self ) -> Option<Duration> {
        if !self.is_playing() {
            return None;
        }
        Some( self.shared.clock.lock().elapsed() )
    }


    /// Gets the current track index.
    pub fn current_index( &self ) -> usize {
        self.shared.playlist.lock().current_index()
    }


    /// Gets the current track path, if any.
    pub fn current_track( &self ) -> Option<PathBuf> {
        self.shared.playlist.lock().current().map( Path::to_path_buf )
    }


    /// Gets a copy of the active track list.
    pub fn tracks( &self ) -> Vec<PathBuf> {
        self.shared.playlist.lock().tracks().to_vec()
    }


    /// Lists the playlist, fully or as a window around the current track.
    pub fn listing( &self, full: bool ) -> Listing {
        let playing = self.is_playing();
        self.shared.playlist.lock().listing( full, playing )
    }
}


impl Drop for Player {
    fn drop( &mut self ) {
        // Never leave a decoder running behind us
        self.stop();
    }
}


#[cfg( test )]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::{ tempdir, TempDir };


    fn library( files: &[&str] ) -> ( TempDir, Arc<PlaylistTree> ) {
        let dir = tempdir().unwrap();
        for file in files {
            let path = dir.path().join( file );
            fs::create_dir_all( path.parent().unwrap() ).unwrap();
            fs::write( &path, b"not real audio" ).unwrap();
        }
        let tree = Arc::new( PlaylistTree::build( dir.path() ).unwrap() );
        ( dir, tree )
    }


    /// Decoder stand-in that ignores its arguments and runs `script`.
    fn shell_decoder( script: &str ) -> DecoderCommand {
        DecoderCommand {
            program: "sh".to_string(),
            args: vec![ "-c".to_string(), script.to_string(), "tunebox".to_string() ],
            offset_flag: Some( "-ss".to_string() ),
        }
    }


    fn wait_until( mut condition: impl FnMut() -> bool ) -> bool {
        let deadline = Instant::now() + Duration::from_secs( 10 );
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep( Duration::from_millis( 10 ) );
        }
        false
    }


    #[test]
    fn test_attempt_finishes_once() {
        let attempt = PlayAttempt::new();
        assert_eq!( attempt.state(), AttemptState::Running );
        assert!( attempt.finish( AttemptState::KilledByUser ) );
        assert!( !attempt.finish( AttemptState::ExitedNaturally ) );
        assert_eq!( attempt.state(), AttemptState::KilledByUser );
    }


    #[test]
    fn test_clock_counts_seek_steps() {
        let mut clock = PlaybackClock::new();
        clock.seek_steps = 2;
        assert!( clock.elapsed() >= Duration::from_secs( 20 ) );

        clock.seek_steps = -3;
        assert_eq!( clock.elapsed(), Duration::ZERO );

        clock.reset();
        assert!( clock.elapsed() < SEEK_STEP );
    }


    #[test]
    fn test_select_missing_keeps_state() {
        let ( _dir, tree ) = library( &[ "A/1.mp3", "A/2.mp3", "B/3.wav" ] );
        let player = Player::new( tree, shell_decoder( "exit 0" ) );

        player.select_playlist( "A" ).unwrap();
        let before = player.tracks();

        let result = player.select_playlist( "missing" );
        assert!( matches!( result, Err( PlayerError::Tree( TreeError::NotFound( _ ) ) ) ) );
        assert_eq!( player.tracks(), before );
        assert_eq!( player.current_index(), 0 );
    }


    #[test]
    fn test_append_is_idempotent() {
        let ( _dir, tree ) = library( &[ "A/1.mp3", "A/2.mp3", "B/3.wav" ] );
        let player = Player::new( tree, shell_decoder( "exit 0" ) );

        player.select_playlist( "B" ).unwrap();
        assert_eq!( player.append_playlist( "A" ).unwrap(), 2 );
        assert_eq!( player.append_playlist( "A" ).unwrap(), 0 );

        let names: Vec<_> = player.tracks().iter()
            .map( |p| p.file_name().unwrap().to_string_lossy().into_owned() )
            .collect();
        assert_eq!( names, [ "3.wav", "1.mp3", "2.mp3" ] );

        assert!( player.append_playlist( "missing" ).is_err() );
        assert_eq!( player.tracks().len(), 3 );
    }


    #[test]
    fn test_start_loop_empty_playlist() {
        let ( _dir, tree ) = library( &[ "A/1.mp3" ] );
        let player = Player::new( tree, shell_decoder( "exit 0" ) );

        assert!( matches!( player.start_loop(), Err( PlayerError::EmptyPlaylist ) ) );
        assert!( !player.is_playing() );
        assert!( !player.is_looping() );
    }


    #[test]
    fn test_seek_when_stopped_is_noop() {
        let ( _dir, tree ) = library( &[ "A/1.mp3" ] );
        let player = Player::new( tree, shell_decoder( "exit 0" ) );
        player.select_playlist( "A" ).unwrap();

        assert_eq!( player.seek_forward().unwrap(), None );
        assert_eq!( player.seek_backward().unwrap(), None );
        assert!( !player.is_playing() );
        assert_eq!( player.elapsed(), None );
    }


    #[test]
    fn test_stop_is_idempotent() {
        let ( _dir, tree ) = library( &[ "A/1.mp3" ] );
        let player = Player::new( tree, shell_decoder( "exit 0" ) );

        player.stop();
        player.stop();
        assert!( !player.is_playing() );
    }


    #[test]
    fn test_launch_failure_resets_state() {
        let ( _dir, tree ) = library( &[ "A/1.mp3" ] );
        let player = Player::new( tree, DecoderCommand::new( "tunebox-no-such-decoder" ) );
        player.select_playlist( "A" ).unwrap();

        assert!( matches!( player.start_loop(), Err( PlayerError::Launch { .. } ) ) );
        assert!( !player.is_playing() );
        assert!( !player.is_looping() );
    }


    #[cfg( unix )]
    #[test]
    fn test_advance_wraps_around() {
        let ( _dir, tree ) = library( &[ "A/1.mp3", "A/2.mp3", "B/3.wav" ] );
        let player = Player::new( tree, shell_decoder( "sleep 30" ) );

        player.select_playlist( "A" ).unwrap();
        player.start_loop().unwrap();
        assert!( player.is_playing() );

        player.play_next().unwrap();
        assert_eq!( player.current_index(), 1 );
        player.play_next().unwrap();
        assert_eq!( player.current_index(), 0 );

        player.play_previous().unwrap();
        assert_eq!( player.current_index(), 1 );
        player.play_next().unwrap();
        assert_eq!( player.current_index(), 0 );

        player.stop();
        assert!( !player.is_playing() );
        assert!( !player.is_looping() );
    }


    #[cfg( unix )]
    #[test]
    fn test_natural_end_advances() {
        let ( _dir, tree ) = library( &[ "A/1.mp3", "A/2.mp3", "A/3.mp3" ] );
        let player = Player::new( tree, shell_decoder( "sleep 0.1" ) );

        player.select_playlist( "A" ).unwrap();
        player.start_loop().unwrap();

        assert!( wait_until( || player.current_index() != 0 ) );
        player.stop();
        assert!( !player.is_playing() );
    }


    #[cfg( unix )]
    #[test]
    fn test_failed_exit_does_not_advance() {
        let ( _dir, tree ) = library( &[ "A/1.mp3", "A/2.mp3" ] );
        let player = Player::new( tree, shell_decoder( "exit 3" ) );

        player.select_playlist( "A" ).unwrap();
        player.start_loop().unwrap();

        assert!( wait_until( || !player.is_playing() ) );
        assert_eq!( player.current_index(), 0 );
        assert!( !player.is_looping() );
    }


    #[cfg( unix )]
    #[test]
    fn test_non_utf8_track_reaches_decoder() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let album = dir.path().join( "A" );
        fs::create_dir_all( &album ).unwrap();
        fs::write( album.join( OsStr::from_bytes( b"caf\xe9.mp3" ) ), b"not real audio" ).unwrap();
        fs::write( album.join( "z.mp3" ), b"not real audio" ).unwrap();

        let tree = Arc::new( PlaylistTree::build( dir.path() ).unwrap() );
        let player = Player::new( tree, shell_decoder( r#"test -f "$1" && sleep 30"# ) );

        player.select_playlist( "A" ).unwrap();
        let first = player.current_track().unwrap();
        assert_eq!( first.file_name().unwrap().as_bytes(), b"caf\xe9.mp3" );

        player.start_loop().unwrap();
        thread::sleep( Duration::from_millis( 500 ) );

        assert!( player.is_playing() );
        assert!( player.is_looping() );
        assert_eq!( player.current_index(), 0 );
        player.stop();
    }


    #[cfg( unix )]
    #[test]
    fn test_natural_end_without_loop_clears_handle() {
        let ( _dir, tree ) = library( &[ "A/1.mp3", "A/2.mp3" ] );
        let player = Player::new( tree, shell_decoder( "sleep 0.2" ) );

        player.select_playlist( "A" ).unwrap();
        player.start_loop().unwrap();
        player.shared.looping.store( false, Ordering::Release );

        assert!( wait_until( || !player.is_playing() ) );
        assert_eq!( player.current_index(), 0 );
    }


    #[cfg( unix )]
    #[test]
    fn test_seek_restarts_same_track() {
        let ( _dir, tree ) = library( &[ "A/1.mp3", "A/2.mp3" ] );
        let player = Player::new( tree, shell_decoder( "sleep 30" ) );

        player.select_playlist( "A" ).unwrap();
        player.start_loop().unwrap();

        let forward = player.seek_forward().unwrap().unwrap();
        assert!( forward >= SEEK_STEP );
        assert_eq!( player.current_index(), 0 );
        assert!( player.is_playing() );

        let back = player.seek_backward().unwrap().unwrap();
        assert!( back < SEEK_STEP );

        // Clamped at the start of the track
        let back = player.seek_backward().unwrap().unwrap();
        assert!( back < SEEK_STEP );
        assert_eq!( player.current_index(), 0 );

        player.stop();
    }


    #[cfg( unix )]
    #[test]
    fn test_listing_marks_playing_track() {
        let ( _dir, tree ) = library( &[ "A/1.mp3", "A/2.mp3" ] );
        let player = Player::new( tree, shell_decoder( "sleep 30" ) );

        player.select_playlist( "A" ).unwrap();
        assert!( player.listing( true ).entries.iter().all( |e| !e.playing ) );

        player.start_loop().unwrap();
        let listing = player.listing( true );
        assert!( listing.entries[ 0 ].playing );
        assert!( !listing.entries[ 1 ].playing );

        player.stop();
    }


    #[cfg( unix )]
    #[test]
    fn test_events_report_track_start() {
        let ( _dir, tree ) = library( &[ "A/1.mp3" ] );
        let player = Player::new( tree, shell_decoder( "sleep 30" ) );

        let started = Arc::new( Mutex::new( Vec::new() ) );
        let started_clone = Arc::clone( &started );
        player.set_event_handler( move |event| {
            if let PlayerEvent::TrackStarted { path, .. } = event {
                started_clone.lock().push( path.clone() );
            }
        });

        player.select_playlist( "A" ).unwrap();
        player.start_loop().unwrap();
        player.stop();

        let started = started.lock();
        assert_eq!( started.len(), 1 );
        assert!( started[ 0 ].ends_with( "A/1.mp3" ) );
    }
}
