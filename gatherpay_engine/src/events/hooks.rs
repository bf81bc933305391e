use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{ContributionRecordedEvent, EventHandler, EventProducer, Handler};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub contribution_recorded_producer: Vec<EventProducer<ContributionRecordedEvent>>,
}

impl EventProducers {
    pub async fn publish_contribution_recorded(&self, event: ContributionRecordedEvent) {
        for producer in &self.contribution_recorded_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_contribution_recorded: Option<EventHandler<ContributionRecordedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_contribution_recorded = hooks.on_contribution_recorded.map(|f| EventHandler::new(buffer_size, f));
        Self { on_contribution_recorded }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_contribution_recorded {
            result.contribution_recorded_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_contribution_recorded {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_contribution_recorded: Option<Handler<ContributionRecordedEvent>>,
}

impl EventHooks {
    pub fn on_contribution_recorded<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(ContributionRecordedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_contribution_recorded = Some(Arc::new(f));
        self
    }
}
