//! Active playlist management
//!
//! Holds the flattened track list the player loops over, the current
//! position, and the listing window shown to the operator.

use std::collections::HashSet;
use std::path::{ Path, PathBuf };


/// Number of entries shown by a windowed listing.
pub const WATCH_WINDOW: usize = 5;


/// Direction of a track change.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Direction {
    Next,
    Prev,
}


/// One line of a playlist listing.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct ListingEntry {
    pub name: String,
    pub playing: bool,
}


/// A playlist listing, possibly cut down to a window.
#[derive( Debug, Clone, PartialEq, Eq, Default )]
pub struct Listing {
    pub entries: Vec<ListingEntry>,
    /// True when the entries do not cover the whole playlist.
    pub truncated: bool,
}


/// Flat, ordered track list with a wrapping cursor.
#[derive( Debug, Default )]
pub struct Playlist {
    tracks: Vec<PathBuf>,
    current_index: usize,
}


impl Playlist {
    /// Creates a new empty playlist.
    pub fn new() -> Self {
        Self::default()
    }


    /// Replaces every track and rewinds to the first one.
    pub fn replace( &mut self, tracks: Vec<PathBuf> ) {
        self.tracks = tracks;
        self.current_index = 0;
    }


    /// Appends tracks, then drops duplicates.
    ///
    /// @returns The number of tracks that were actually new
    pub fn append( &mut self, tracks: impl IntoIterator<Item = PathBuf> ) -> usize {
        let before = self.tracks.len();
        self.tracks.extend( tracks );
        self.dedup();
        self.tracks.len() - before
    }


    /// Removes duplicate tracks from the playlist, keeping the first occurrence.
    ///
    /// @returns The number of duplicates removed
    pub fn dedup( &mut self ) -> usize {
        let original_len = self.tracks.len();
        let current = self.current().map( Path::to_path_buf );

        let mut seen = HashSet::new();
        self.tracks.retain( |track| seen.insert( track.clone() ) );

        // First occurrences keep their relative order, so the current track
        // can only move towards the front.
        if let Some( current ) = current {
            self.current_index = self.tracks.iter()
                .position( |t| *t == current )
                .unwrap_or( 0 );
        }

        original_len - self.tracks.len()
    }


    /// Gets the current track.
    pub fn current( &self ) -> Option<&Path> {
        self.tracks.get( self.current_index ).map( PathBuf::as_path )
    }


    /// Moves the cursor one step, wrapping at both ends.
    ///
    /// @returns The new current track, or None when the playlist is empty
    pub fn advance( &mut self, direction: Direction ) -> Option<&Path> {
        let len = self.tracks.len();
        if len == 0 {
            self.current_index = 0;
            return None;
        }

        self.current_index = match direction {
            Direction::Next => ( self.current_index + 1 ) % len,
            Direction::Prev => ( self.current_index + len - 1 ) % len,
        };
        self.current()
    }


    /// Gets all tracks in the playlist.
    pub fn tracks( &self ) -> &[PathBuf] {
        &self.tracks
    }


    /// Gets the number of tracks.
    pub fn len( &self ) -> usize {
        self.tracks.len()
    }


    /// Returns true if the playlist is empty.
    pub fn is_empty( &self ) -> bool {
        self.tracks.is_empty()
    }


    /// Gets the current track index (0 when empty).
    pub fn current_index( &self ) -> usize {
        if self.tracks.is_empty() { 0 } else { self.current_index }
    }


    /// Builds a listing of the whole playlist, or of the window starting at
    /// the current track.
    ///
    /// @param full - List everything regardless of length
    /// @param playing - Whether the current track is actually playing
    pub fn listing( &self, full: bool, playing: bool ) -> Listing {
        let len = self.tracks.len();
        let current = self.current_index();

        let range = if full || len < WATCH_WINDOW {
            0..len
        } else {
            current..( current + WATCH_WINDOW ).min( len )
        };
        let truncated = range.len() < len;

        let entries = range
            .map( |i| ListingEntry {
                name: display_name( &self.tracks[ i ] ),
                playing: playing && i == current,
            })
            .collect();

        Listing { entries, truncated }
    }
}


/// Display name for a track: its file name.
pub fn display_name( path: &Path ) -> String {
    path.file_name()
        .map( |n| n.to_string_lossy().into_owned() )
        .unwrap_or_else( || path.display().to_string() )
}


#[cfg( test )]
mod tests {
    use super::*;


    fn paths( names: &[&str] ) -> Vec<PathBuf> {
        names.iter().map( |n| PathBuf::from( format!( "/music/{}", n ) ) ).collect()
    }


    #[test]
    fn test_replace_rewinds() {
        let mut playlist = Playlist::new();
        playlist.replace( paths( &[ "a.mp3", "b.mp3" ] ) );
        playlist.advance( Direction::Next );
        assert_eq!( playlist.current_index(), 1 );

        playlist.replace( paths( &[ "c.mp3" ] ) );
        assert_eq!( playlist.current_index(), 0 );
        assert_eq!( playlist.current(), Some( Path::new( "/music/c.mp3" ) ) );
    }


    #[test]
    fn test_advance_wraps_both_ways() {
        let mut playlist = Playlist::new();
        playlist.replace( paths( &[ "a.mp3", "b.mp3", "c.mp3" ] ) );

        playlist.advance( Direction::Prev );
        assert_eq!( playlist.current_index(), 2 );
        playlist.advance( Direction::Next );
        assert_eq!( playlist.current_index(), 0 );
    }


    #[test]
    fn test_next_then_prev_is_identity() {
        let mut playlist = Playlist::new();
        playlist.replace( paths( &[ "a.mp3", "b.mp3", "c.mp3", "d.mp3" ] ) );

        for start in 0..playlist.len() {
            while playlist.current_index() != start {
                playlist.advance( Direction::Next );
            }
            playlist.advance( Direction::Next );
            playlist.advance( Direction::Prev );
            assert_eq!( playlist.current_index(), start );
        }
    }


    #[test]
    fn test_advance_empty() {
        let mut playlist = Playlist::new();
        assert_eq!( playlist.advance( Direction::Next ), None );
        assert_eq!( playlist.current_index(), 0 );
    }


    #[test]
    fn test_append_dedups_in_order() {
        let mut playlist = Playlist::new();
        playlist.replace( paths( &[ "a.mp3", "b.mp3" ] ) );

        let added = playlist.append( paths( &[ "b.mp3", "c.mp3", "a.mp3" ] ) );
        assert_eq!( added, 1 );
        assert_eq!( playlist.tracks(), paths( &[ "a.mp3", "b.mp3", "c.mp3" ] ).as_slice() );

        let added = playlist.append( paths( &[ "b.mp3", "c.mp3", "a.mp3" ] ) );
        assert_eq!( added, 0 );
        assert_eq!( playlist.len(), 3 );
    }


    #[test]
    fn test_dedup_keeps_current_track() {
        let mut playlist = Playlist::new();
        playlist.replace( paths( &[ "a.mp3", "a.mp3", "b.mp3" ] ) );
        playlist.advance( Direction::Next );
        playlist.advance( Direction::Next );
        assert_eq!( playlist.current(), Some( Path::new( "/music/b.mp3" ) ) );

        assert_eq!( playlist.dedup(), 1 );
        assert_eq!( playlist.current(), Some( Path::new( "/music/b.mp3" ) ) );
        assert_eq!( playlist.current_index(), 1 );
    }


    #[test]
    fn test_listing_short_playlist_is_full() {
        let mut playlist = Playlist::new();
        playlist.replace( paths( &[ "a.mp3", "b.mp3" ] ) );
        playlist.advance( Direction::Next );

        let listing = playlist.listing( false, true );
        assert!( !listing.truncated );
        assert_eq!( listing.entries, vec![
            ListingEntry { name: "a.mp3".into(), playing: false },
            ListingEntry { name: "b.mp3".into(), playing: true },
        ] );
    }


    #[test]
    fn test_listing_window() {
        let mut playlist = Playlist::new();
        playlist.replace( paths( &[ "1.mp3", "2.mp3", "3.mp3", "4.mp3", "5.mp3", "6.mp3", "7.mp3" ] ) );
        for _ in 0..3 {
            playlist.advance( Direction::Next );
        }

        let listing = playlist.listing( false, false );
        assert!( listing.truncated );
        let names: Vec<_> = listing.entries.iter().map( |e| e.name.as_str() ).collect();
        assert_eq!( names, [ "4.mp3", "5.mp3", "6.mp3", "7.mp3" ] );
        assert!( listing.entries.iter().all( |e| !e.playing ) );

        let full = playlist.listing( true, true );
        assert!( !full.truncated );
        assert_eq!( full.entries.len(), 7 );
        assert!( full.entries[ 3 ].playing );
    }


    #[test]
    fn test_listing_window_covering_everything() {
        let mut playlist = Playlist::new();
        playlist.replace( paths( &[ "1.mp3", "2.mp3", "3.mp3", "4.mp3", "5.mp3" ] ) );

        let listing = playlist.listing( false, false );
        assert_eq!( listing.entries.len(), 5 );
        assert!( !listing.truncated );
    }
}
