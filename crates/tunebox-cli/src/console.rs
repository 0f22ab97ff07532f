//! Colored console output.
//!
//! Messages can arrive from player threads while the operator is typing,
//! so every write clears the prompt line first and redraws it afterwards.

use std::io::{ self, Write };

use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::{ style, Print, Stylize },
    terminal::{ Clear, ClearType },
};
use parking_lot::Mutex;


pub const BANNER: &str = r#"
                         ~                   *-------*******
                        __      _   _!__     *-------*******
                   _   /  \_  _/ \  |::| ___ **-----********   ~
                 _/ \_/^    \/   ^\/|::|\|:|  **---*****/^\_
              /\/  ^ /  ^    / ^ ___|::|_|:|_/\_******/  ^  \
             /  \  _/ ^ ^   /    |::|--|:|---|  \__/  ^     ^\___
           _/_^  \/  ^    _/ ^   |::|::|:|-::| ^ /_  ^    ^  ^   \_
   _Q   / _Q  _Q_Q  / _Q    _Q   |::|::|:|:::|/    ^ \   _Q      ^
_O|/O___O|/O_OO|/O__O|/O__O|/O__________________________O|/O__________
//////////////////////////////////////////////////////////////////////
                 Life is fantastic, welcome back
"#;


/// Color class of a console message.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub enum Tone {
    /// State changes and informational text.
    State,

    /// Errors and warnings.
    Emphasize,

    /// Track announcements.
    Playing,

    /// Playlist listings.
    Listing,
}


/// The prompt line currently being edited.
#[derive( Debug, Clone, Default )]
pub struct PromptLine {
    pub prompt: String,
    pub content: String,
    /// Cursor position in characters within `content`.
    pub cursor: usize,
}


/// Shared console writer.
#[derive( Debug, Default )]
pub struct Console {
    prompt: Mutex<Option<PromptLine>>,
}


impl Console {
    /// Creates a new console with no active prompt.
    pub fn new() -> Self {
        Self::default()
    }


    /// Prints a message, one console line per text line.
    pub fn log( &self, tone: Tone, msg: &str ) {
        self.write_above_prompt( |out| {
            for line in msg.lines() {
                let styled = match tone {
                    Tone::State => line.yellow(),
                    Tone::Emphasize => line.red(),
                    Tone::Playing => line.green(),
                    Tone::Listing => line.blue(),
                };
                queue!( out, Print( styled ), Print( "\r\n" ) )?;
            }
            Ok(())
        });
    }


    /// Prints one playlist entry, highlighting the playing one.
    pub fn listing_entry( &self, name: &str, playing: bool ) {
        if !playing {
            self.log( Tone::Listing, name );
            return;
        }

        self.write_above_prompt( |out| {
            queue!(
                out,
                Print( "->".cyan() ),
                Print( " " ),
                Print( style( format!( "({})", name ) ).red().underlined() ),
                Print( "\r\n" ),
            )
        });
    }


    /// Sets or clears the prompt line and redraws it.
    pub fn set_prompt( &self, line: Option<PromptLine> ) {
        let mut prompt = self.prompt.lock();
        *prompt = line;

        let mut out = io::stdout().lock();
        let result = queue!( out, MoveToColumn( 0 ), Clear( ClearType::CurrentLine ) )
            .and_then( |_| match prompt.as_ref() {
                Some( line ) => draw_prompt( &mut out, line ),
                None => Ok(()),
            })
            .and_then( |_| out.flush() );

        if let Err( e ) = result {
            tracing::debug!( "Failed to draw prompt: {}", e );
        }
    }


    fn write_above_prompt( &self, write: impl FnOnce( &mut io::StdoutLock<'static> ) -> io::Result<()> ) {
        let prompt = self.prompt.lock();
        let mut out = io::stdout().lock();

        let result = ( || {
            if prompt.is_some() {
                queue!( out, MoveToColumn( 0 ), Clear( ClearType::CurrentLine ) )?;
            }
            write( &mut out )?;
            if let Some( line ) = prompt.as_ref() {
                draw_prompt( &mut out, line )?;
            }
            out.flush()
        })();

        if let Err( e ) = result {
            tracing::debug!( "Failed to write to console: {}", e );
        }
    }
}


fn draw_prompt( out: &mut impl Write, line: &PromptLine ) -> io::Result<()> {
    let column = line.prompt.chars().count() + line.cursor;
    queue!(
        out,
        Print( line.prompt.as_str().cyan() ),
        Print( &line.content ),
        MoveToColumn( u16::try_from( column ).unwrap_or( u16::MAX ) ),
    )
}
