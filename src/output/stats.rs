//! Statistics reporting.

use console::style;

use crate::download::DownloadState;

/// Print end-of-run statistics for a chat.
pub fn print_chat_stats(state: &DownloadState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "{}",
        style(format!("Statistics for {}:", state.chat_name)).bold()
    );
    println!("  Photos:     {}", state.photo_count);
    println!("  Videos:     {}", state.video_count);
    println!("  Audio:      {}", state.audio_count);
    println!("  Voice:      {}", state.voice_count);
    println!("  Documents:  {}", state.document_count);
    println!("  Skipped:    {} (filtered out)", state.skipped_count);
    if state.failed_count() > 0 {
        println!(
            "  Failed:     {}",
            style(state.failed_count()).red()
        );
    }
    println!(
        "  Total:      {} of {} downloaded",
        state.total_downloaded(),
        state.total_files
    );
    println!("{}", style("═".repeat(50)).dim());
}
