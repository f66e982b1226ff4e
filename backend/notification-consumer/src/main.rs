use actix_web::{middleware, web, App, HttpServer};
use notification_consumer::{
    logging, metrics, Config, HttpNotificationSender, NotificationConsumer, NotificationSender,
};
use queue_listener::{KafkaDeadLetterSink, KafkaQueueListener};
use std::sync::Arc;
use tokio::sync::watch;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = Config::from_env()?;

    tracing::info!(
        env = %config.app.env,
        queue = %config.queues.queue,
        "Starting notification consumer"
    );

    let notification_sender: Arc<dyn NotificationSender> =
        Arc::new(HttpNotificationSender::new(&config.notification_service)?);
    let consumer = Arc::new(NotificationConsumer::new(notification_sender));

    // Bind the consumer to the notification queue
    let mut listener = KafkaQueueListener::bind(&config.kafka, &config.queues.queue, consumer)?
        .with_retry_policy(config.retry.clone());

    match &config.queues.dead_letter_queue {
        Some(dlq) => {
            let sink = KafkaDeadLetterSink::from_config(&config.kafka, dlq)?;
            tracing::info!("Dead-letter queue: {}", sink.topic());
            listener = listener.with_dead_letters(Arc::new(sink));
        }
        None => {
            tracing::warn!("No dead-letter queue configured - failed messages will be dropped");
        }
    }

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let mut listener_task = tokio::spawn(async move {
        listener
            .run_until(async move {
                let _ = shutdown_rx.changed().await;
            })
            .await
    });

    let addr = format!("0.0.0.0:{}", config.app.port);
    tracing::info!("Starting HTTP server on {}", addr);

    let server = HttpServer::new(|| {
        App::new()
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/metrics", web::get().to(metrics::serve_metrics))
    })
    .bind(&addr)?
    .run();
    let server_handle = server.handle();

    // Whichever stops first takes the other down with it
    tokio::select! {
        result = server => {
            result?;
            tracing::info!("HTTP server stopped, shutting down queue listener");
            let _ = shutdown_tx.send(true);
            match listener_task.await {
                Ok(Ok(())) => tracing::info!("Queue listener stopped"),
                Ok(Err(e)) => tracing::error!("Queue listener failed: {}", e),
                Err(e) => tracing::error!("Queue listener task panicked: {}", e),
            }
        }
        joined = &mut listener_task => {
            match joined {
                Ok(Ok(())) => tracing::warn!("Queue listener exited unexpectedly"),
                Ok(Err(e)) => tracing::error!("Queue listener failed: {}", e),
                Err(e) => tracing::error!("Queue listener task panicked: {}", e),
            }
            server_handle.stop(true).await;
        }
    }

    Ok(())
}
