/// Render the control page for the given streaming state.
pub fn render_index(streaming: bool) -> String {
    let body = if streaming {
        r#"<div class="feed"><img src="/video_feed/" alt="Live camera feed"></div>
    <p>
      <a class="button" href="/stop_stream/">Stop stream</a>
      <a class="button" href="/capture/">Capture frame</a>
    </p>"#
    } else {
        r#"<p class="stopped">Streaming is stopped.</p>
    <p>
      <a class="button" href="/start_stream/">Start stream</a>
      <a class="button" href="/capture/">Capture frame</a>
    </p>"#
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Webcam</title>
    <style>
      body {{ font-family: sans-serif; margin: 2em; }}
      .feed img {{ max-width: 100%; border: 1px solid #ccc; }}
      .button {{ padding: 0.4em 1em; border: 1px solid #333; text-decoration: none; margin-right: 0.5em; }}
    </style>
  </head>
  <body>
    <h1>Webcam</h1>
    {body}
  </body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_page_embeds_feed() {
        let html = render_index(true);
        assert!(html.contains(r#"src="/video_feed/""#));
        assert!(html.contains("/stop_stream/"));
        assert!(!html.contains("/start_stream/"));
    }

    #[test]
    fn test_stopped_page_offers_start() {
        let html = render_index(false);
        assert!(html.contains("/start_stream/"));
        assert!(!html.contains("/video_feed/"));
    }
}
