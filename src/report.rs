//! Textual report for the non-animated variant. Everything here is derived
//! from final engine/table state through read-only queries; the report is a
//! boundary contract, not part of the simulation logic.

use crate::engine::Engine;
use std::collections::HashSet;
use std::fmt::Write;

/// Render the full run report: one line per input, a summary, the first
/// collision observed, and the chains of every multi-occupant bucket.
pub fn render(engine: &Engine) -> String {
    let mut out = String::new();
    let m = engine.table().size();
    let n = engine.tokens().len();

    let _ = writeln!(out, "--- Pigeonhole Hash Collision Demonstrator ---");
    let _ = writeln!(out, "Hash space size (M, pigeonholes): {m}");
    let _ = writeln!(out, "Number of inputs  (N, pigeons):   {n}");
    if n > m {
        let _ = writeln!(
            out,
            "N > M: at least {} collisions are guaranteed by the pigeonhole principle.",
            n - m
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(50));

    // Re-derive each input's bucket and collision flag from the retained
    // token sequence and strategy; the table itself only holds final chains.
    let mut seen = HashSet::new();
    for (i, token) in engine.tokens().iter().enumerate() {
        let bucket = engine.strategy().bucket_for(token, m);
        let collision = !seen.insert(bucket);
        let _ = writeln!(
            out,
            "Input {:>4}: {} -> bucket {:>4}  ({})",
            i + 1,
            token,
            bucket,
            if collision { "collision" } else { "first placement" }
        );
    }

    let stats = engine.stats();
    let _ = writeln!(out, "{}", "-".repeat(50));
    let _ = writeln!(out, "Total inputs:       {n}");
    let _ = writeln!(out, "Hash space size:    {m}");
    let _ = writeln!(out, "Total collisions:   {}", stats.total_collisions);
    let _ = writeln!(
        out,
        "Unique buckets used: {} / {m}",
        stats.unique_buckets_used
    );

    if let Some(fc) = engine.first_collision() {
        let _ = writeln!(out, "\n<<< First collision demonstrated >>>");
        let _ = writeln!(out, "Bucket:  #{}", fc.bucket);
        let _ = writeln!(out, "Input 1: '{}'", fc.first_occupant);
        let _ = writeln!(out, "Input 2: '{}'", fc.newcomer);
        let _ = writeln!(
            out,
            "Two different inputs produced the same bucket index."
        );
    }

    let crowded: Vec<_> = engine
        .table()
        .iter()
        .filter(|(_, chain)| chain.len() > 1)
        .collect();
    if !crowded.is_empty() {
        let _ = writeln!(out, "\nBuckets with more than one occupant:");
        for (index, chain) in crowded {
            let tokens: Vec<_> = chain.iter().map(|t| format!("'{t}'")).collect();
            let _ = writeln!(
                out,
                "  bucket #{index} ({} items): {}",
                chain.len(),
                tokens.join(", ")
            );
        }
    }

    out
}
