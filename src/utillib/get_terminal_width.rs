use terminal_size::{terminal_size, Width};

/// Width for clap's help output; falls back to 120 if stdout is not a
/// terminal.
pub fn get_terminal_width() -> usize {
    if let Some((Width(width), _)) = terminal_size() {
        usize::from(width)
    } else {
        120
    }
}
