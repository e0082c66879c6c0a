pub mod inject_user_agent;
