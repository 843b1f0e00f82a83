#[cfg(test)]
mod camera_lifecycle_tests {
    use camfeed::commands::{capture_to_disk, open_feed, start_stream, stop_stream};
    use camfeed::testing::{MockCaptureMode, MockOpener};
    use camfeed::CameraManager;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn setup(mode: MockCaptureMode) -> (Arc<CameraManager>, MockOpener) {
        let opener = MockOpener::new(mode).with_resolution(16, 16);
        let camera = Arc::new(CameraManager::new(Arc::new(opener.clone())));
        (camera, opener)
    }

    #[tokio::test]
    async fn test_concurrent_starts_open_one_device() {
        let (camera, opener) = setup(MockCaptureMode::Success);

        let handles: Vec<_> = (0..8)
            .map(|_| tokio::spawn(start_stream(camera.clone())))
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert!(camera.is_open());
        assert_eq!(opener.stats().opens(), 1);
    }

    #[tokio::test]
    async fn test_stop_ends_running_feed() {
        let (camera, opener) = setup(MockCaptureMode::Success);
        start_stream(camera.clone()).await.unwrap();

        let mut feed = Box::pin(open_feed(camera.clone(), 80).await.unwrap().into_stream());
        assert!(feed.next().await.is_some());
        assert!(feed.next().await.is_some());

        stop_stream(camera.clone()).await.unwrap();

        let next = timeout(Duration::from_secs(5), feed.next()).await.expect("feed ended");
        assert!(next.is_none());
        assert_eq!(opener.stats().releases(), 1);
    }

    #[tokio::test]
    async fn test_feed_and_capture_share_one_device() {
        let dir = tempfile::tempdir().unwrap();
        let (camera, opener) = setup(MockCaptureMode::Success);

        let mut feed = Box::pin(open_feed(camera.clone(), 80).await.unwrap().into_stream());
        assert!(feed.next().await.is_some());

        capture_to_disk(camera.clone(), dir.path().join("still.jpg"), 90)
            .await
            .unwrap();
        assert!(feed.next().await.is_some());
        assert_eq!(opener.stats().opens(), 1);
    }

    #[tokio::test]
    async fn test_dropping_feed_stops_reads() {
        let (camera, opener) = setup(MockCaptureMode::Success);
        let mut feed = Box::pin(open_feed(camera.clone(), 80).await.unwrap().into_stream());
        feed.next().await;
        drop(feed);

        let reads = opener.stats().reads();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(opener.stats().reads(), reads);
        assert!(camera.is_open());
    }

    #[tokio::test]
    async fn test_stop_after_open_failure_is_ok() {
        let (camera, _opener) = setup(MockCaptureMode::OpenFailure);
        assert!(start_stream(camera.clone()).await.is_err());
        stop_stream(camera.clone()).await.unwrap();
        stop_stream(camera).await.unwrap();
    }
}
