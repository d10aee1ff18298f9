//! Helpers for inspecting decoded command lists

use std::fmt::Write;

use crate::formats::command::Command;

/// Drop the `Nop` commands a decode leaves behind
pub fn strip_nops(commands: Vec<Command>) -> Vec<Command> {
    commands.into_iter().filter(|cmd| !cmd.is_nop()).collect()
}

/// Render one command per line
pub fn format_commands(commands: &[Command]) -> String {
    let mut out = String::new();
    for cmd in commands {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{cmd}");
    }
    out
}
