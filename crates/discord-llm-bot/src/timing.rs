//! Wall-clock timing for pipeline calls

use std::future::Future;
use std::time::Instant;

/// Await `fut` and return its output with the elapsed time in seconds
pub async fn timed<F, T>(name: &str, fut: F) -> (T, f64)
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let output = fut.await;
    let elapsed = start.elapsed().as_secs_f64();
    tracing::info!("Finished '{}' in {:.2} secs", name, elapsed);
    (output, elapsed)
}
