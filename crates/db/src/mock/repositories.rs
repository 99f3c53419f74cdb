use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use watchroster_core::{
    models::{
        booking::{Booking, NewBooking},
        recurring::{NewAssignment, RecurringAssignment},
        schedule::{Schedule, ScheduleRequest},
        user::User,
    },
    notify::{Notification, Notifier},
    store::{
        AssignmentRepository, BookingRepository, Inserted, ScheduleRepository, UserRepository,
    },
};

mock! {
    pub Store {}

    #[async_trait]
    impl ScheduleRepository for Store {
        async fn list_schedules(&self) -> eyre::Result<Vec<Schedule>>;

        async fn get_schedule(&self, id: i64) -> eyre::Result<Option<Schedule>>;

        async fn insert_schedule(&self, request: ScheduleRequest) -> eyre::Result<Schedule>;

        async fn replace_schedule(
            &self,
            id: i64,
            request: ScheduleRequest,
        ) -> eyre::Result<Option<Schedule>>;

        async fn delete_schedule(&self, id: i64) -> eyre::Result<bool>;
    }

    #[async_trait]
    impl BookingRepository for Store {
        async fn find_booking(
            &self,
            schedule_id: i64,
            shift_start: DateTime<Utc>,
        ) -> eyre::Result<Option<Booking>>;

        async fn get_booking(&self, id: i64) -> eyre::Result<Option<Booking>>;

        async fn insert_booking(&self, booking: NewBooking) -> eyre::Result<Inserted<Booking>>;

        async fn set_attendance(&self, id: i64, attended: bool) -> eyre::Result<Option<Booking>>;

        async fn list_bookings_for_user(
            &self,
            user_id: i64,
            from: Option<DateTime<Utc>>,
        ) -> eyre::Result<Vec<Booking>>;

        async fn count_bookings_for_schedule(&self, schedule_id: i64) -> eyre::Result<i64>;
    }

    #[async_trait]
    impl UserRepository for Store {
        async fn get_user(&self, id: i64) -> eyre::Result<Option<User>>;

        async fn find_user_by_phone(&self, phone: String) -> eyre::Result<Option<User>>;
    }

    #[async_trait]
    impl AssignmentRepository for Store {
        async fn list_active_assignments(&self) -> eyre::Result<Vec<RecurringAssignment>>;

        async fn list_assignments_for_user(
            &self,
            user_id: i64,
        ) -> eyre::Result<Vec<RecurringAssignment>>;

        async fn get_assignment(&self, id: i64) -> eyre::Result<Option<RecurringAssignment>>;

        async fn insert_assignment(
            &self,
            assignment: NewAssignment,
        ) -> eyre::Result<Inserted<RecurringAssignment>>;

        async fn deactivate_assignment(
            &self,
            id: i64,
        ) -> eyre::Result<Option<RecurringAssignment>>;

        async fn deactivate_assignments_for_schedule(&self, schedule_id: i64) -> eyre::Result<u64>;
    }
}

mock! {
    pub Notifier {}

    #[async_trait]
    impl Notifier for Notifier {
        async fn enqueue(&self, notification: Notification) -> eyre::Result<()>;
    }
}
