use tracing::warn;

pub fn remove_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

pub async fn retry<T, E, F, Fut>(mut retries: u32, base_delay_ms: u64, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
{
    let mut attempt = 0u32;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if retries == 0 => return Err(e),
            Err(e) => {
                // Exponential backoff: base_delay * 2^attempt, capped at 30s
                let delay = (base_delay_ms * (1u64 << attempt.min(5))).min(30_000);
                warn!("Attempt {} failed ({:?}), retrying in {}ms", attempt + 1, e, delay);
                tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                retries -= 1;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_remove_trailing_slash() {
        assert_eq!(remove_trailing_slash("https://quote.example/v2/"), "https://quote.example/v2");
        assert_eq!(remove_trailing_slash("https://quote.example/v2"), "https://quote.example/v2");
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let attempts = &AtomicU32::new(0);
        let result: Result<u32, String> = retry(3, 1, || async move {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err("rate_limited".to_string())
            } else {
                Ok(n)
            }
        })
        .await;
        assert_eq!(result, Ok(2));
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let attempts = &AtomicU32::new(0);
        let result: Result<(), &str> = retry(2, 1, || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err("rate_limited")
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }
}
