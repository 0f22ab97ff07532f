//! Tunebox Core - Playlist tree and playback engine
//!
//! This crate scans a music directory into a tree of playlists and drives
//! an external decoder process to loop over the selected one.

pub mod command;
pub mod decoder;
pub mod player;
pub mod playlist;
pub mod tree;

pub use command::{ Command, CommandError };
pub use decoder::DecoderCommand;
pub use player::{ Player, PlayerError, PlayerEvent, SEEK_STEP };
pub use playlist::{ Direction, Listing, ListingEntry, Playlist };
pub use tree::{ Node, PlaylistTree, TreeError };
