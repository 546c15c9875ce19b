//! # 会话状态
//!
//! ## 设计思路
//!
//! 进程内唯一的可变存储：当前图片、当前参数、最近一次结果。
//! 只有重新采集图片才会重置结果。
//!
//! 并发请求不取消，而是按序号裁决：
//! - 每个请求领取单调递增的序号
//! - 响应序号必须大于已应用序号，且不早于当前图片的“纪元”序号
//! - 不满足条件的响应视为过期，直接丢弃
//!
//! 该结构本身不加锁，由编排器用 `Mutex` 包裹，且从不跨 `.await` 持有。

use crate::capture::ImageSource;
use crate::extraction::ExtractionResult;
use crate::params::{ExtractionParameters, ParameterController};

/// 一次已发出请求的凭据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
}

/// 会话状态。
#[derive(Debug, Default)]
pub struct SessionState {
    image: Option<ImageSource>,
    params: ParameterController,
    last_result: Option<(ExtractionResult, ExtractionParameters)>,
    issued_seq: u64,
    applied_seq: u64,
    image_epoch: u64,
    in_flight: usize,
}

impl SessionState {
    pub fn new(params: ExtractionParameters) -> Self {
        Self {
            params: ParameterController::new(params),
            ..Self::default()
        }
    }

    pub fn image(&self) -> Option<&ImageSource> {
        self.image.as_ref()
    }

    pub fn params(&self) -> &ParameterController {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterController {
        &mut self.params
    }

    /// 最近一次已应用的结果及其触发参数。
    pub fn last_result(&self) -> Option<&(ExtractionResult, ExtractionParameters)> {
        self.last_result.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// 整体替换当前图片，开启新纪元；旧图片的在途响应此后一律过期。
    pub fn replace_image(&mut self, image: ImageSource) {
        self.image = Some(image);
        self.last_result = None;
        self.image_epoch = self.issued_seq + 1;
    }

    /// 领取请求序号。
    pub fn begin_request(&mut self) -> RequestTicket {
        self.issued_seq += 1;
        self.in_flight += 1;
        RequestTicket { seq: self.issued_seq }
    }

    /// 请求结束（无论成败），返回剩余在途数量。
    pub fn finish_request(&mut self) -> usize {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.in_flight
    }

    /// 尝试应用响应；过期响应返回 `false`。
    pub fn apply_result(
        &mut self,
        ticket: RequestTicket,
        result: ExtractionResult,
        params: ExtractionParameters,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.applied_seq = ticket.seq;
        self.last_result = Some((result, params));
        true
    }

    /// 该序号的响应是否仍可应用。
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.seq >= self.image_epoch && ticket.seq > self.applied_seq
    }
}
