mod health_check;
mod helpers;
mod subscribers_count;
