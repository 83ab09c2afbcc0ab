use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::broker::{Broker, ManualClock, MessageFlags, SharedBroker, handler};
use crate::ids::{msg, priority, server, topic};
use crate::utils::{BrokerError, ErrorKind};

/// Power manager broadcasts a low-battery alarm, the display and logger react,
/// and the logger asks storage to persist the event through a queued send.
#[test]
fn integration_alarm_flows_across_domains() {
    let mut broker = Broker::with_clock(Arc::new(ManualClock::new(1_000)));
    broker.init().unwrap();

    let seen: Arc<Mutex<Vec<String>>> = Arc::default();

    let display_log = seen.clone();
    let logger_log = seen.clone();
    let storage_log = seen.clone();

    broker.register_server(server::DISPLAY, None).unwrap();
    broker.register_server(server::LOG, None).unwrap();
    broker
        .register_server(
            server::STORAGE,
            Some(handler(move |_, m| {
                storage_log
                    .lock()
                    .unwrap()
                    .push(format!("storage:{:?}", m.payload()));
                Ok(())
            })),
        )
        .unwrap();

    broker.create_topic(topic::ALARM_EVENT).unwrap();
    broker
        .subscribe(
            topic::ALARM_EVENT,
            server::DISPLAY,
            Some(handler(move |_, m| {
                assert!(m.flags.contains(MessageFlags::BROADCAST));
                display_log.lock().unwrap().push("display".into());
                Ok(())
            })),
        )
        .unwrap();
    broker
        .subscribe(
            topic::ALARM_EVENT,
            server::LOG,
            Some(handler(move |broker, m| {
                logger_log.lock().unwrap().push("log".into());
                broker.send(
                    server::LOG,
                    server::STORAGE,
                    msg::STORAGE_WRITE,
                    m.payload(),
                    priority::LOW,
                )
            })),
        )
        .unwrap();

    let delivered = broker
        .publish(
            server::POWER,
            topic::ALARM_EVENT,
            msg::POWER_BATTERY,
            &[5],
            priority::CRITICAL,
        )
        .unwrap();
    assert_eq!(delivered, 2);
    assert_eq!(broker.pending_count(server::STORAGE).unwrap(), 1);

    let stored = broker.process(server::STORAGE, 0).unwrap();
    assert_eq!(stored, 1);

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["display".to_string(), "log".into(), "storage:[5]".into()]
    );

    let stats = broker.stats().unwrap();
    assert_eq!(stats.active_servers, 3);
    assert_eq!(stats.active_topics, 1);
    assert_eq!(stats.total_sent, 2);
    assert_eq!(stats.total_delivered, 3);
    assert_eq!(stats.total_dropped, 0);

    let logger = broker.server_info(server::LOG).unwrap();
    assert_eq!(logger.sent, 1);
    assert!(!logger.has_handler);

    let alarms = broker.topic_info(topic::ALARM_EVENT).unwrap();
    assert_eq!(alarms.subscribers, 2);
    assert_eq!(alarms.published, 1);

    broker.deinit().unwrap();
    assert_eq!(broker.stats(), Err(BrokerError::NotInitialized));
}

/// A flooded sensor queue drops the overflow, keeps the oldest messages and
/// recovers once drained.
#[test]
fn integration_overflow_then_recovery() {
    let mut broker = Broker::new();
    broker.init().unwrap();
    broker.register_server(server::SENSOR, None).unwrap();

    let mut overflowed = 0;
    for i in 0..40_u8 {
        match broker.send(
            server::TIMER,
            server::SENSOR,
            msg::SENSOR_DATA,
            &[i],
            priority::NORMAL,
        ) {
            Ok(()) => {}
            Err(e) => {
                assert_eq!(e.kind(), ErrorKind::QueueFull);
                overflowed += 1;
            }
        }
    }
    assert_eq!(overflowed, 8);

    let first = broker.receive(server::SENSOR).unwrap().unwrap();
    assert_eq!(first.payload(), &[0]);
    broker
        .send(
            server::TIMER,
            server::SENSOR,
            msg::SENSOR_DATA,
            &[99],
            priority::NORMAL,
        )
        .unwrap();

    let info = broker.server_info(server::SENSOR).unwrap();
    assert_eq!(info.pending, 32);
    assert_eq!(info.dropped, 8);

    let stats = broker.stats().unwrap();
    assert_eq!(stats.queue_overflows, 8);
    assert_eq!(stats.total_dropped, 8);
    assert_eq!(stats.total_sent, 33);
}

#[tokio::test]
async fn integration_request_response_between_tasks() {
    let mut broker = Broker::new();
    broker.init().unwrap();
    broker.register_server(server::COMM, None).unwrap();
    broker
        .register_server(
            server::STORAGE,
            Some(handler(|broker, m| {
                let mut reply = m.payload().to_vec();
                reply.reverse();
                broker.respond(m, &reply)
            })),
        )
        .unwrap();
    let shared = SharedBroker::new(broker);

    let worker = {
        let shared = shared.clone();
        tokio::task::spawn_blocking(move || {
            loop {
                if shared.process(server::STORAGE, 0).unwrap() > 0 {
                    break;
                }
                std::thread::sleep(Duration::from_millis(1));
            }
        })
    };

    let requester = {
        let shared = shared.clone();
        tokio::task::spawn_blocking(move || {
            shared.request(
                server::COMM,
                server::STORAGE,
                msg::STORAGE_READ,
                &[1, 2, 3],
                Duration::from_secs(5),
            )
        })
    };

    let reply = requester.await.unwrap().unwrap();
    worker.await.unwrap();

    assert_eq!(reply.src, server::STORAGE);
    assert_eq!(reply.dst, server::COMM);
    assert_eq!(reply.kind, msg::STORAGE_READ);
    assert_eq!(reply.payload(), &[3, 2, 1]);
    assert_eq!(shared.pending_count(server::COMM).unwrap(), 0);
}

#[tokio::test]
async fn integration_request_to_silent_server_times_out() {
    let mut broker = Broker::new();
    broker.init().unwrap();
    broker.register_server(server::COMM, None).unwrap();
    broker.register_server(server::NETWORK, None).unwrap();
    let shared = SharedBroker::new(broker);

    let result = tokio::task::spawn_blocking(move || {
        shared.request(
            server::COMM,
            server::NETWORK,
            msg::COMM_STATUS,
            &[],
            Duration::from_millis(20),
        )
    })
    .await
    .unwrap();

    assert_eq!(result.unwrap_err().kind(), ErrorKind::Timeout);
}
