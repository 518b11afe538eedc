// SPDX-License-Identifier: MIT OR Apache-2.0
use erdp::ErrorDisplay;
use std::error::Error;
use std::fmt::Arguments;
use std::io::Write;
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log::print(false, termcolor::Color::Green, 'I', format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log::print(true, termcolor::Color::Yellow, 'W', format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($err:ident, $($arg:tt)*) => {
        $crate::log::print_error(format_args!($($arg)*), &$err)
    };
    ($($arg:tt)*) => {
        $crate::log::print(true, termcolor::Color::Red, 'E', format_args!($($arg)*))
    };
}

/// Writes a single line with colored category to stdout or stderr.
pub fn print(stderr: bool, color: Color, cat: char, msg: Arguments) {
    let writer = new_writer(stderr);
    let mut buffer = begin(&writer, color, cat);

    writeln!(&mut buffer, "{msg}").unwrap();

    writer.print(&buffer).unwrap();
}

/// Writes `msg` followed by the whole chain of `err` to stderr.
pub fn print_error<E: Error>(msg: Arguments, err: &E) {
    let writer = new_writer(true);
    let mut buffer = begin(&writer, Color::Red, 'E');

    writeln!(&mut buffer, "{msg}: {}.", err.display()).unwrap();

    writer.print(&buffer).unwrap();
}

fn new_writer(stderr: bool) -> BufferWriter {
    if stderr {
        BufferWriter::stderr(ColorChoice::Auto)
    } else {
        BufferWriter::stdout(ColorChoice::Auto)
    }
}

fn begin(writer: &BufferWriter, color: Color, cat: char) -> Buffer {
    let mut buffer = writer.buffer();

    buffer
        .set_color(ColorSpec::new().set_fg(Some(color)))
        .unwrap();
    write!(&mut buffer, "[{cat}] ").unwrap();
    buffer.reset().unwrap();

    buffer
}
