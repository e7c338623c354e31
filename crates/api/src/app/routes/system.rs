pub async fn root() -> &'static str {
    "Bistro boss is running"
}
