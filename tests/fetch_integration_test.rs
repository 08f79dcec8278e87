use location_lite::{
    FetchConfig, Fix, InMemoryLocationProvider, LocationApi, LocationManagerLite, ProviderId,
    Response,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn fix(provider: ProviderId, accuracy: f32, age_millis: i64) -> Fix {
    Fix::new(provider, 35.6762, 139.6503, accuracy, now_millis() - age_millis)
}

fn setup(config: FetchConfig) -> (Arc<InMemoryLocationProvider>, Arc<dyn LocationApi>) {
    let provider = Arc::new(InMemoryLocationProvider::with_default_providers());
    let manager = LocationManagerLite::new(provider.clone(), config).unwrap();
    (provider, manager.provide())
}

async fn wait_for_subscriptions(provider: &InMemoryLocationProvider, count: usize) {
    while provider.active_subscriptions() < count {
        tokio::task::yield_now().await;
    }
}

fn assert_all_released(provider: &InMemoryLocationProvider) {
    assert_eq!(provider.active_subscriptions(), 0);
    assert_eq!(provider.cancellations(), provider.registrations());
}

#[tokio::test]
async fn test_cache_prefers_most_accurate_fresh_fix() {
    let (provider, api) = setup(FetchConfig::default());
    provider.set_last_known(fix(ProviderId::gps(), 20.0, 5_000));
    provider.set_last_known(fix(ProviderId::network(), 10.0, 4_000));

    let chosen = api.get_fix().await.get_or_none().unwrap();

    assert_eq!(chosen.provider, ProviderId::network());
    assert_eq!(chosen.accuracy, 10.0);
    assert_eq!(provider.registrations(), 0);
}

#[tokio::test]
async fn test_stale_cache_falls_through_to_live_request() {
    let (provider, api) = setup(FetchConfig::default());
    provider.set_last_known(fix(ProviderId::gps(), 3.0, 70_000));

    let (response, ()) = tokio::join!(api.get_fix(), async {
        wait_for_subscriptions(&provider, 2).await;
        provider.publish_fix(fix(ProviderId::network(), 35.0, 0));
    });

    let live = response.get_or_none().unwrap();
    assert_eq!(live.provider, ProviderId::network());
    assert_eq!(provider.registrations(), 2);
    assert_all_released(&provider);
}

#[tokio::test(start_paused = true)]
async fn test_no_enabled_provider_fails_fast() {
    let (provider, api) = setup(FetchConfig::default());
    provider.set_enabled(&ProviderId::gps(), false);
    provider.set_enabled(&ProviderId::network(), false);

    let started = Instant::now();
    let response = api.get_fix().await;

    assert!(started.elapsed() < Duration::from_millis(10_000));
    let message = response.fold(|_| String::new(), |m| m.unwrap_or_default());
    assert!(message.contains("No location providers are enabled"));
    assert_eq!(provider.registrations(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_bounds_live_request() {
    let (provider, api) = setup(FetchConfig::new(250, 60_000));

    let started = Instant::now();
    let response = api.get_fix().await;
    let elapsed = started.elapsed();

    assert!(response.is_error());
    assert!(elapsed >= Duration::from_millis(250));
    assert!(elapsed < Duration::from_millis(300));
    assert_eq!(provider.registrations(), 2);
    assert_all_released(&provider);
}

#[tokio::test]
async fn test_first_arrival_wins() {
    let (provider, api) = setup(FetchConfig::default());

    let (response, ()) = tokio::join!(api.get_fix(), async {
        wait_for_subscriptions(&provider, 2).await;
        provider.publish_fix(fix(ProviderId::network(), 40.0, 0));
        provider.publish_fix(fix(ProviderId::gps(), 5.0, 0));
    });

    assert_eq!(
        response.get_or_none().unwrap().provider,
        ProviderId::network()
    );
    assert_all_released(&provider);

    // The late GPS fix only refreshed the cache; the next call is served from it.
    let cached = api.get_fix().await.get_or_none().unwrap();
    assert_eq!(cached.provider, ProviderId::gps());
    assert_eq!(provider.registrations(), 2);
}

#[tokio::test]
async fn test_provider_disabled_during_wait() {
    let (provider, api) = setup(FetchConfig::default());

    let (response, ()) = tokio::join!(api.get_fix(), async {
        wait_for_subscriptions(&provider, 2).await;
        provider.set_enabled(&ProviderId::gps(), false);
    });

    let (data, message) = response.into_parts();
    assert!(data.is_none());
    assert!(message.unwrap().contains("Provider gps disabled"));
    assert_all_released(&provider);
}

#[tokio::test]
async fn test_provider_fault_becomes_error() {
    let (provider, api) = setup(FetchConfig::default());

    let (response, ()) = tokio::join!(api.get_fix(), async {
        wait_for_subscriptions(&provider, 2).await;
        provider.fail(&ProviderId::network(), "chipset reset");
    });

    let mut reported = None;
    let response = response.on_error(|m| reported = m.map(str::to_string));
    assert!(response.is_error());
    assert!(reported.unwrap().contains("chipset reset"));
    assert_all_released(&provider);
}

#[tokio::test]
async fn test_missing_authorization_becomes_error() {
    let (provider, api) = setup(FetchConfig::default());
    provider.set_authorized(false);

    let response = api.get_fix().await;

    let message = response.fold(|_| String::new(), |m| m.unwrap_or_default());
    assert!(message.contains("authorization"));
    assert_eq!(provider.registrations(), 0);
}

#[tokio::test]
async fn test_token_cancellation_releases_listeners() {
    let (provider, api) = setup(FetchConfig::default());
    let cancel = CancellationToken::new();

    let task = tokio::spawn({
        let api = api.clone();
        let cancel = cancel.clone();
        async move { api.get_fix_until_cancelled(&cancel).await }
    });
    wait_for_subscriptions(&provider, 2).await;
    cancel.cancel();

    let outcome = assert_ok!(task.await);
    assert!(outcome.is_none());
    assert_eq!(provider.registrations(), 2);
    assert_all_released(&provider);
}

#[tokio::test]
async fn test_aborted_task_releases_listeners() {
    let (provider, api) = setup(FetchConfig::default());

    let task = tokio::spawn(async move { api.get_fix().await });
    wait_for_subscriptions(&provider, 2).await;
    task.abort();

    let join_error = assert_err!(task.await);
    assert!(join_error.is_cancelled());
    assert_eq!(provider.registrations(), 2);
    assert_all_released(&provider);
}

#[tokio::test]
async fn test_concurrent_calls_register_independently() {
    let (provider, api) = setup(FetchConfig::default());

    let (first, second, ()) = tokio::join!(api.get_fix(), api.get_fix(), async {
        wait_for_subscriptions(&provider, 4).await;
        assert_eq!(provider.active_subscriptions_for(&ProviderId::gps()), 2);
        provider.publish_fix(fix(ProviderId::gps(), 6.0, 0));
    });

    assert_eq!(first, second);
    assert!(matches!(first, Response::Success { data: Some(_) }));
    assert_eq!(provider.registrations(), 4);
    assert_all_released(&provider);
}

#[test]
fn test_fold_round_trip() {
    for x in [0, 1, -7, i32::MAX] {
        assert_eq!(
            Response::success(x).fold(|d| d.map(|v| v.wrapping_add(1)), |_| None),
            Some(x.wrapping_add(1))
        );
    }
    for m in ["", "timeout", "Provider gps disabled"] {
        assert_eq!(
            Response::<i32>::error(m).fold(|_| None, |msg| msg),
            Some(m.to_string())
        );
    }
}
