/// Whether `url` points at a plain MP4 file rather than a manifest.
pub fn is_direct_video(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.ends_with(".mp4") || lower.contains(".mp4?")
}

/// Single-entry manifest that lets HLS-only players open `url`.
pub fn wrapper_manifest(url: &str) -> String {
    ["#EXTM3U", "#EXTINF:-1,", url].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_video_detection() {
        assert!(is_direct_video("http://bdstream.site/playback_video/fall.mp4"));
        assert!(is_direct_video("https://cdn.example/movie.MP4?sig=abc"));
        assert!(!is_direct_video("https://cdn.example/live/index.m3u8"));
        assert!(!is_direct_video("https://cdn.example/movie.mp4/index.m3u8"));
    }

    #[test]
    fn test_wrapper_has_three_lines() {
        let url = "https://cdn.example/movie.mp4";
        let manifest = wrapper_manifest(url);
        let lines: Vec<&str> = manifest.lines().collect();

        assert_eq!(lines, vec!["#EXTM3U", "#EXTINF:-1,", url]);
    }
}
