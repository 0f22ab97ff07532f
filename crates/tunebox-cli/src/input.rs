//! Line editing for the command prompt.
//!
//! Reads one line at a time in raw mode so that Tab can complete command
//! names, playlist names and directories.

use std::io;

use crossterm::{
    event::{ self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers },
    terminal::{ disable_raw_mode, enable_raw_mode },
};

use crate::completion::Completer;
use crate::console::{ Console, PromptLine, Tone };


/// Result of reading one line.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum ReadOutcome {
    /// The operator pressed Enter.
    Line( String ),

    /// Ctrl-C: the line was discarded.
    Interrupted,

    /// Ctrl-D on an empty line.
    Eof,
}


/// Input buffer for prompt text entry.
#[derive( Debug, Default )]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}


impl InputBuffer {
    /// Creates a new empty input buffer.
    pub fn new() -> Self {
        Self::default()
    }


    /// Inserts a character at the cursor position.
    pub fn insert( &mut self, c: char ) {
        self.content.insert( self.cursor, c );
        self.cursor += c.len_utf8();
    }


    /// Deletes the character before the cursor.
    pub fn backspace( &mut self ) {
        if let Some( prev ) = self.prev_boundary() {
            self.content.remove( prev );
            self.cursor = prev;
        }
    }


    /// Deletes the character at the cursor position.
    pub fn delete( &mut self ) {
        if self.cursor < self.content.len() {
            self.content.remove( self.cursor );
        }
    }


    /// Replaces the whole content and moves the cursor to the end.
    pub fn set( &mut self, content: impl Into<String> ) {
        self.content = content.into();
        self.cursor = self.content.len();
    }


    /// Replaces everything from byte `start` on and moves the cursor to the end.
    pub fn replace_tail( &mut self, start: usize, tail: &str ) {
        self.content.truncate( start.min( self.content.len() ) );
        self.content.push_str( tail );
        self.cursor = self.content.len();
    }


    /// Takes the content out, leaving the buffer empty.
    pub fn take( &mut self ) -> String {
        self.cursor = 0;
        std::mem::take( &mut self.content )
    }


    /// Gets the current content.
    pub fn content( &self ) -> &str {
        &self.content
    }


    /// Gets the cursor position as character count (for display).
    pub fn cursor_char_pos( &self ) -> usize {
        self.content[ ..self.cursor ].chars().count()
    }


    /// Moves cursor left by one character.
    pub fn move_left( &mut self ) {
        if let Some( prev ) = self.prev_boundary() {
            self.cursor = prev;
        }
    }


    /// Moves cursor right by one character.
    pub fn move_right( &mut self ) {
        if let Some( c ) = self.content[ self.cursor.. ].chars().next() {
            self.cursor += c.len_utf8();
        }
    }


    /// Moves cursor to the beginning.
    pub fn move_home( &mut self ) {
        self.cursor = 0;
    }


    /// Moves cursor to the end.
    pub fn move_end( &mut self ) {
        self.cursor = self.content.len();
    }


    /// Returns true if the buffer is empty.
    pub fn is_empty( &self ) -> bool {
        self.content.is_empty()
    }


    fn prev_boundary( &self ) -> Option<usize> {
        self.content[ ..self.cursor ].char_indices().last().map( |( i, _ )| i )
    }
}


/// Disables raw mode when dropped.
struct RawModeGuard;


impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok( RawModeGuard )
    }
}


impl Drop for RawModeGuard {
    fn drop( &mut self ) {
        let _ = disable_raw_mode();
    }
}


/// Prompt line editor with history and tab completion.
pub struct LineEditor<'a> {
    console: &'a Console,
    prompt: String,
    buffer: InputBuffer,
    history: Vec<String>,
    /// Position while browsing history; `history.len()` means the live line.
    history_pos: usize,
}


impl<'a> LineEditor<'a> {
    /// Creates an editor that draws `prompt` through `console`.
    pub fn new( console: &'a Console, prompt: impl Into<String> ) -> Self {
        Self {
            console,
            prompt: prompt.into(),
            buffer: InputBuffer::new(),
            history: Vec::new(),
            history_pos: 0,
        }
    }


    /// Reads one line from the terminal.
    pub fn read_line( &mut self, completer: &dyn Completer ) -> io::Result<ReadOutcome> {
        let _raw = RawModeGuard::enable()?;
        self.buffer = InputBuffer::new();
        self.history_pos = self.history.len();
        self.redraw();

        let outcome = loop {
            let Event::Key( key ) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some( outcome ) = self.handle_key( key, completer ) {
                break outcome;
            }
            self.redraw();
        };

        self.finish( &outcome );
        Ok( outcome )
    }


    fn handle_key( &mut self, key: KeyEvent, completer: &dyn Completer ) -> Option<ReadOutcome> {
        let ctrl = key.modifiers.contains( KeyModifiers::CONTROL );

        match key.code {
            KeyCode::Enter => return Some( ReadOutcome::Line( self.buffer.take() ) ),
            KeyCode::Char( 'c' ) if ctrl => return Some( ReadOutcome::Interrupted ),
            KeyCode::Char( 'd' ) if ctrl => {
                if self.buffer.is_empty() {
                    return Some( ReadOutcome::Eof );
                }
                self.buffer.delete();
            }
            KeyCode::Char( 'a' ) if ctrl => self.buffer.move_home(),
            KeyCode::Char( 'e' ) if ctrl => self.buffer.move_end(),
            KeyCode::Char( 'u' ) if ctrl => self.buffer.set( String::new() ),
            KeyCode::Char( c ) if !ctrl => self.buffer.insert( c ),
            KeyCode::Backspace => self.buffer.backspace(),
            KeyCode::Delete => self.buffer.delete(),
            KeyCode::Left => self.buffer.move_left(),
            KeyCode::Right => self.buffer.move_right(),
            KeyCode::Home => self.buffer.move_home(),
            KeyCode::End => self.buffer.move_end(),
            KeyCode::Up => self.history_back(),
            KeyCode::Down => self.history_forward(),
            KeyCode::Tab => self.complete( completer ),
            _ => {}
        }
        None
    }


    fn complete( &mut self, completer: &dyn Completer ) {
        let completion = completer.complete( self.buffer.content() );

        match completion.candidates.as_slice() {
            [] => {}
            [ only ] => self.buffer.replace_tail( completion.start, only ),
            candidates => {
                let prefix = common_prefix( candidates );
                let current = &self.buffer.content()[ completion.start.. ];
                if prefix.len() > current.len() {
                    self.buffer.replace_tail( completion.start, &prefix );
                } else {
                    self.console.log( Tone::Listing, &candidates.join( "  " ) );
                }
            }
        }
    }


    fn history_back( &mut self ) {
        if self.history_pos > 0 {
            self.history_pos -= 1;
            self.buffer.set( self.history[ self.history_pos ].clone() );
        }
    }


    fn history_forward( &mut self ) {
        if self.history_pos < self.history.len() {
            self.history_pos += 1;
            let line = self.history.get( self.history_pos ).cloned().unwrap_or_default();
            self.buffer.set( line );
        }
    }


    fn redraw( &self ) {
        self.console.set_prompt( Some( PromptLine {
            prompt: self.prompt.clone(),
            content: self.buffer.content().to_string(),
            cursor: self.buffer.cursor_char_pos(),
        }));
    }


    /// Leaves the prompt line on screen as typed and moves below it.
    fn finish( &mut self, outcome: &ReadOutcome ) {
        let shown = match outcome {
            ReadOutcome::Line( line ) => line.clone(),
            ReadOutcome::Interrupted => format!( "{}^C", self.buffer.content() ),
            ReadOutcome::Eof => String::new(),
        };

        self.console.set_prompt( None );
        self.console.log( Tone::Listing, &format!( "{}{}", self.prompt, shown ) );

        if let ReadOutcome::Line( line ) = outcome {
            let line = line.trim();
            if !line.is_empty() && self.history.last().map( String::as_str ) != Some( line ) {
                self.history.push( line.to_string() );
            }
        }
    }
}


/// Longest prefix shared by every candidate, on a char boundary.
fn common_prefix( candidates: &[String] ) -> String {
    let Some(( first, rest )) = candidates.split_first() else {
        return String::new();
    };

    let mut len = first.len();
    for candidate in rest {
        len = first
            .char_indices()
            .zip( candidate.chars() )
            .take_while( |(( _, a ), b )| a == b )
            .last()
            .map( |(( i, a ), _ )| i + a.len_utf8() )
            .unwrap_or( 0 )
            .min( len );
    }
    first[ ..len ].to_string()
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_buffer_editing() {
        let mut buffer = InputBuffer::new();
        for c in "use Rck".chars() {
            buffer.insert( c );
        }
        buffer.move_left();
        buffer.move_left();
        buffer.insert( 'o' );
        assert_eq!( buffer.content(), "use Rock" );
        assert_eq!( buffer.cursor_char_pos(), 6 );

        buffer.move_end();
        buffer.backspace();
        assert_eq!( buffer.content(), "use Roc" );

        buffer.move_home();
        buffer.delete();
        assert_eq!( buffer.content(), "se Roc" );
    }


    #[test]
    fn test_buffer_multibyte() {
        let mut buffer = InputBuffer::new();
        buffer.set( "use Café" );
        buffer.backspace();
        assert_eq!( buffer.content(), "use Caf" );
        buffer.insert( 'é' );
        buffer.move_left();
        assert_eq!( buffer.cursor_char_pos(), 7 );
        buffer.move_right();
        assert_eq!( buffer.cursor_char_pos(), 8 );
    }


    #[test]
    fn test_replace_tail_and_take() {
        let mut buffer = InputBuffer::new();
        buffer.set( "use Ro" );
        buffer.replace_tail( 4, "Rock" );
        assert_eq!( buffer.content(), "use Rock" );
        assert_eq!( buffer.take(), "use Rock" );
        assert!( buffer.is_empty() );
    }


    #[test]
    fn test_common_prefix() {
        let candidates = vec![ "watch".to_string(), "watch-all".to_string() ];
        assert_eq!( common_prefix( &candidates ), "watch" );

        let candidates = vec![ "prev".to_string(), "play".to_string() ];
        assert_eq!( common_prefix( &candidates ), "p" );

        let candidates = vec![ "Beat".to_string(), "Jazz".to_string() ];
        assert_eq!( common_prefix( &candidates ), "" );
    }
}
