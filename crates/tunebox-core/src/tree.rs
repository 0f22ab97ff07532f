//! Playlist tree scanning and lookup
//!
//! Walks a music directory once at startup and turns it into an immutable
//! tree of named groups (directories) and leaves (playable files).

use std::collections::BTreeSet;
use std::fs;
use std::path::{ Path, PathBuf };

use thiserror::Error;


/// Playable audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &[ "mp3", "wav" ];


/// Errors that can occur while building or querying the tree.
#[derive( Debug, Error )]
pub enum TreeError {
    #[error( "Failed to scan {path}: {source}" )]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error( "Could not find playlist: {0}" )]
    NotFound( String ),
}


/// A node of the playlist tree.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum Node {
    /// A directory, named after its basename.
    Group { name: String, children: Vec<Node> },

    /// A playable file.
    Leaf { path: PathBuf },
}


impl Node {
    /// Returns the group name, or `None` for a leaf.
    pub fn name( &self ) -> Option<&str> {
        match self {
            Node::Group { name, .. } => Some( name ),
            Node::Leaf { .. } => None,
        }
    }


    /// Returns true for leaves.
    pub fn is_leaf( &self ) -> bool {
        matches!( self, Node::Leaf { .. } )
    }


    /// Collects every leaf path below this node in depth-first order.
    pub fn flatten( &self ) -> Vec<PathBuf> {
        let mut tracks = Vec::new();
        self.flatten_into( &mut tracks );
        tracks
    }


    fn flatten_into( &self, tracks: &mut Vec<PathBuf> ) {
        match self {
            Node::Leaf { path } => tracks.push( path.clone() ),
            Node::Group { children, .. } => {
                for child in children {
                    child.flatten_into( tracks );
                }
            }
        }
    }


    /// Depth-first search for a group called `name`, this node included.
    fn find( &self, name: &str ) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Group { name: own, children } => {
                if own == name {
                    return Some( self );
                }
                children.iter().find_map( |child| child.find( name ) )
            }
        }
    }
}


/// Immutable playlist tree built from a root music directory.
#[derive( Debug )]
pub struct PlaylistTree {
    root: Node,
    names: BTreeSet<String>,
}


impl PlaylistTree {
    /// Scans `root` recursively and builds the tree.
    ///
    /// @param root - The music directory to scan
    ///
    /// @returns The tree, or `TreeError::Scan` naming the first unreadable directory
    pub fn build( root: &Path ) -> Result<Self, TreeError> {
        let canonical = fs::canonicalize( root ).map_err( |source| TreeError::Scan {
            path: root.to_path_buf(),
            source,
        })?;

        // The root keeps the name it was given, even when it is a symlink
        let name = std::path::absolute( root )
            .ok()
            .and_then( |p| p.file_name().map( |n| n.to_string_lossy().into_owned() ) )
            .unwrap_or_else( || group_name( &canonical ) );

        tracing::info!( "Scanning: {:?}", canonical );

        let mut names = BTreeSet::new();
        let mut track_count = 0;
        let root = Self::scan_group( &canonical, name, &mut names, &mut track_count )?;

        tracing::info!( "Found {} tracks in {} playlists", track_count, names.len() );

        Ok( Self { root, names } )
    }


    fn scan_group(
        dir: &Path,
        name: String,
        names: &mut BTreeSet<String>,
        track_count: &mut usize,
    ) -> Result<Node, TreeError> {
        let scan_error = |source: std::io::Error| TreeError::Scan { path: dir.to_path_buf(), source };

        let mut entries = fs::read_dir( dir )
            .map_err( scan_error )?
            .collect::<Result<Vec<_>, _>>()
            .map_err( scan_error )?;
        entries.sort_by_key( |entry| entry.file_name() );

        let mut leaves = Vec::new();
        let mut groups = Vec::new();

        for entry in entries {
            let path = entry.path();

            if path.is_dir() {
                let child_name = group_name( &path );
                groups.push( Self::scan_group( &path, child_name, names, track_count )? );
            } else if path.is_file() && is_playable( &path ) {
                leaves.push( Node::Leaf { path } );
            }
        }

        *track_count += leaves.len();
        names.insert( name.clone() );

        leaves.extend( groups );
        Ok( Node::Group { name, children: leaves } )
    }


    /// Gets the root group.
    pub fn root( &self ) -> &Node {
        &self.root
    }


    /// Gets every group name seen during the scan, sorted and unique.
    pub fn names( &self ) -> impl Iterator<Item = &str> {
        self.names.iter().map( String::as_str )
    }


    /// Returns true if a group with this name exists somewhere in the tree.
    pub fn contains( &self, name: &str ) -> bool {
        self.names.contains( name )
    }


    /// Finds the subtree called `name`.
    ///
    /// An empty name selects the whole tree. Duplicate names resolve to the
    /// first group met in depth-first order.
    pub fn find( &self, name: &str ) -> Result<&Node, TreeError> {
        if name.is_empty() {
            return Ok( &self.root );
        }

        self.root.find( name ).ok_or_else( || TreeError::NotFound( name.to_string() ) )
    }


    /// Resolves `name` and flattens it into an ordered track list.
    pub fn tracks( &self, name: &str ) -> Result<Vec<PathBuf>, TreeError> {
        self.find( name ).map( Node::flatten )
    }
}


/// Checks if a file has a playable extension.
fn is_playable( path: &Path ) -> bool {
    path.extension()
        .and_then( |e| e.to_str() )
        .map( |e| SUPPORTED_EXTENSIONS.contains( &e.to_lowercase().as_str() ) )
        .unwrap_or( false )
}


fn group_name( dir: &Path ) -> String {
    dir.file_name()
        .map( |n| n.to_string_lossy().into_owned() )
        .unwrap_or_else( || dir.to_string_lossy().into_owned() )
}


#[cfg( test )]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::tempdir;


    fn touch( path: &Path ) {
        if let Some( parent ) = path.parent() {
            fs::create_dir_all( parent ).unwrap();
        }
        fs::write( path, b"not real audio" ).unwrap();
    }


    #[test]
    fn test_is_playable() {
        assert!( is_playable( Path::new( "/music/a.mp3" ) ) );
        assert!( is_playable( Path::new( "/music/a.WAV" ) ) );
        assert!( !is_playable( Path::new( "/music/a.flac" ) ) );
        assert!( !is_playable( Path::new( "/music/cover.jpg" ) ) );
        assert!( !is_playable( Path::new( "/music/mp3" ) ) );
    }


    #[test]
    fn test_find_subtree_and_flatten() {
        let dir = tempdir().unwrap();
        touch( &dir.path().join( "A/1.mp3" ) );
        touch( &dir.path().join( "A/2.mp3" ) );
        touch( &dir.path().join( "B/3.wav" ) );

        let tree = PlaylistTree::build( dir.path() ).unwrap();
        let root = fs::canonicalize( dir.path() ).unwrap();

        assert_eq!(
            tree.tracks( "A" ).unwrap(),
            vec![ root.join( "A/1.mp3" ), root.join( "A/2.mp3" ) ]
        );
        assert_eq!( tree.tracks( "B" ).unwrap(), vec![ root.join( "B/3.wav" ) ] );
    }


    #[test]
    fn test_leaves_precede_groups() {
        let dir = tempdir().unwrap();
        touch( &dir.path().join( "a_sub/x.mp3" ) );
        touch( &dir.path().join( "z.mp3" ) );
        touch( &dir.path().join( "notes.txt" ) );

        let tree = PlaylistTree::build( dir.path() ).unwrap();
        let root = fs::canonicalize( dir.path() ).unwrap();

        match tree.root() {
            Node::Group { children, .. } => {
                assert_eq!( children.len(), 2 );
                assert!( children[ 0 ].is_leaf() );
                assert_eq!( children[ 1 ].name(), Some( "a_sub" ) );
            }
            Node::Leaf { .. } => panic!( "root must be a group" ),
        }

        assert_eq!(
            tree.root().flatten(),
            vec![ root.join( "z.mp3" ), root.join( "a_sub/x.mp3" ) ]
        );
    }


    #[test]
    fn test_empty_name_returns_root() {
        let dir = tempdir().unwrap();
        touch( &dir.path().join( "A/1.mp3" ) );

        let tree = PlaylistTree::build( dir.path() ).unwrap();
        assert_eq!( tree.find( "" ).unwrap(), tree.root() );

        let root_name = tree.root().name().unwrap().to_string();
        assert_eq!( tree.find( &root_name ).unwrap(), tree.root() );
    }


    #[test]
    fn test_registered_names_resolve() {
        let dir = tempdir().unwrap();
        touch( &dir.path().join( "Rock/Live/1.mp3" ) );
        touch( &dir.path().join( "Jazz/2.wav" ) );
        fs::create_dir_all( dir.path().join( "Empty" ) ).unwrap();

        let tree = PlaylistTree::build( dir.path() ).unwrap();

        for name in [ "Rock", "Live", "Jazz", "Empty" ] {
            assert!( tree.contains( name ), "missing {}", name );
        }
        for name in tree.names() {
            assert_eq!( tree.find( name ).unwrap().name(), Some( name ) );
        }
        assert!( tree.tracks( "Empty" ).unwrap().is_empty() );
    }


    #[test]
    fn test_duplicate_names_first_match_wins() {
        let dir = tempdir().unwrap();
        touch( &dir.path().join( "a/Live/first.mp3" ) );
        touch( &dir.path().join( "b/Live/second.mp3" ) );

        let tree = PlaylistTree::build( dir.path() ).unwrap();
        let root = fs::canonicalize( dir.path() ).unwrap();

        assert_eq!( tree.tracks( "Live" ).unwrap(), vec![ root.join( "a/Live/first.mp3" ) ] );
    }


    #[test]
    fn test_missing_name() {
        let dir = tempdir().unwrap();
        touch( &dir.path().join( "A/1.mp3" ) );

        let tree = PlaylistTree::build( dir.path() ).unwrap();
        assert!( matches!( tree.find( "missing" ), Err( TreeError::NotFound( _ ) ) ) );
    }


    #[test]
    fn test_unreadable_root_fails() {
        let dir = tempdir().unwrap();
        let result = PlaylistTree::build( &dir.path().join( "does-not-exist" ) );
        assert!( matches!( result, Err( TreeError::Scan { .. } ) ) );
    }


    #[cfg( unix )]
    #[test]
    fn test_unreadable_subdirectory_fails() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        touch( &dir.path().join( "A/1.mp3" ) );
        touch( &dir.path().join( "B/locked/2.mp3" ) );

        let locked = dir.path().join( "B/locked" );
        fs::set_permissions( &locked, fs::Permissions::from_mode( 0o000 ) ).unwrap();

        // Permission bits do not stop a privileged user
        let readable = fs::read_dir( &locked ).is_ok();

        let result = PlaylistTree::build( dir.path() );
        fs::set_permissions( &locked, fs::Permissions::from_mode( 0o755 ) ).unwrap();

        if readable {
            return;
        }
        match result {
            Err( TreeError::Scan { path, .. } ) => assert!( path.ends_with( "B/locked" ) ),
            other => panic!( "expected a scan error, got {:?}", other ),
        }
    }


    #[cfg( unix )]
    #[test]
    fn test_symlinked_root_keeps_given_name() {
        let dir = tempdir().unwrap();
        touch( &dir.path().join( "Audio/1.mp3" ) );

        let link = dir.path().join( "music" );
        std::os::unix::fs::symlink( dir.path().join( "Audio" ), &link ).unwrap();

        let tree = PlaylistTree::build( &link ).unwrap();
        let real = fs::canonicalize( dir.path().join( "Audio" ) ).unwrap();

        assert_eq!( tree.root().name(), Some( "music" ) );
        assert!( tree.contains( "music" ) );
        assert!( !tree.contains( "Audio" ) );
        assert_eq!( tree.tracks( "music" ).unwrap(), vec![ real.join( "1.mp3" ) ] );
    }
}
