cfg_if! {
    if #[cfg(feature = "transport_tcp")] {
        pub mod tcp;
    } else {}
}
