pub mod live_worker;
