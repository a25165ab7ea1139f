use url::Url;

use super::rewrite::{RewrittenLine, rewrite_line};

/// Rewrites every URI line of a manifest, leaving tags and comments alone.
pub struct StreamProcessor {
    base: Url,
    proxy_segments: bool,
}

/// Per-variant counts of a finished rewrite, for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStats {
    pub absolute: usize,
    pub segments: usize,
    pub manifests: usize,
    pub unchanged: usize,
}

impl StreamProcessor {
    pub fn new(base: Url, proxy_segments: bool) -> Self {
        Self {
            base,
            proxy_segments,
        }
    }

    /// Process entire playlist content and return the transformed content.
    /// Line endings are normalized to `\n`; a trailing newline is preserved.
    pub fn process_with_stats(&self, input: &str) -> (String, RewriteStats) {
        let mut stats = RewriteStats::default();
        let output: Vec<String> = input
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .map(|line| {
                let rewritten = rewrite_line(line, &self.base, self.proxy_segments);
                match rewritten {
                    RewrittenLine::Unchanged(_) => stats.unchanged += 1,
                    RewrittenLine::Absolute(_) => stats.absolute += 1,
                    RewrittenLine::ProxiedSegment(_) => stats.segments += 1,
                    RewrittenLine::ProxiedManifest(_) => stats.manifests += 1,
                }
                rewritten.into_string()
            })
            .collect();

        (output.join("\n"), stats)
    }
}
