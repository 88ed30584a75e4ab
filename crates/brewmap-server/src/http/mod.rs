// SPDX-License-Identifier: Apache-2.0

pub mod forms;
pub(crate) mod handlers;
pub(crate) mod pages;
pub(crate) mod request_tracing;
pub(crate) mod response_contract;
pub(crate) mod session;
