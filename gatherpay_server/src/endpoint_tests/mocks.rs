use gatherpay_engine::{
    db_types::{Contribution, Event, EventId, Money, NewEvent, OrganizerId, ParticipantId, PaymentReference},
    traits::{
        ContributionLedger,
        EventManagement,
        EventQueryError,
        GatewayError,
        GatewayOrder,
        GatewayOrderRequest,
        LedgerError,
        PaymentGateway,
        RecordOutcome,
    },
};
use mockall::mock;

mock! {
    pub FundingStore {}
    impl ContributionLedger for FundingStore {
        async fn record_contribution(&self, event_id: &EventId, participant: &ParticipantId, amount: Money, payment: &PaymentReference) -> Result<RecordOutcome, LedgerError>;
        async fn fetch_contributions(&self, event_id: &EventId) -> Result<Vec<Contribution>, LedgerError>;
    }
    impl EventManagement for FundingStore {
        async fn fetch_event(&self, event_id: &EventId) -> Result<Option<Event>, EventQueryError>;
        async fn fetch_events(&self) -> Result<Vec<Event>, EventQueryError>;
        async fn fetch_events_for_organizer(&self, organizer: &OrganizerId) -> Result<Vec<Event>, EventQueryError>;
        async fn insert_event(&self, event: NewEvent) -> Result<Event, EventQueryError>;
        async fn cancel_event(&self, event_id: &EventId) -> Result<Event, EventQueryError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError>;
    }
}
