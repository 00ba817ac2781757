use tabled::Table;

use crate::{info, utils};

/// Prints the mood presets and the audio feature targets each one applies.
pub fn moods() {
    let table = Table::new(utils::mood_table_rows());
    println!("{}", table);
    info!("Mood targets override values averaged from seed tracks.");
}
