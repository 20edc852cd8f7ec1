//! 数据源分支点
//!
//! 页面层读取实体列表的唯一入口：演示模式读本地 fixture 提供方，
//! 否则走 HTTP 网关。页面自身不感知模式。

use classdesk_session::SessionResult;
use classdesk_shared::{
    Announcement, Fee, Page, SchoolClass, Section, Student, Subject, Teacher,
};
use leptos::prelude::*;

use crate::auth::AuthContext;

fn demo_active(ctx: &AuthContext) -> bool {
    ctx.state.get_untracked().is_demo_mode
}

pub async fn classes(ctx: &AuthContext) -> SessionResult<Page<SchoolClass>> {
    if demo_active(ctx) {
        ctx.engine().demo().classes().await
    } else {
        ctx.api.get_classes().await
    }
}

pub async fn sections(ctx: &AuthContext) -> SessionResult<Page<Section>> {
    if demo_active(ctx) {
        ctx.engine().demo().sections().await
    } else {
        ctx.api.get_sections().await
    }
}

pub async fn subjects(ctx: &AuthContext) -> SessionResult<Page<Subject>> {
    if demo_active(ctx) {
        ctx.engine().demo().subjects().await
    } else {
        ctx.api.get_subjects().await
    }
}

pub async fn students(ctx: &AuthContext) -> SessionResult<Page<Student>> {
    if demo_active(ctx) {
        ctx.engine().demo().students().await
    } else {
        ctx.api.get_students().await
    }
}

pub async fn teachers(ctx: &AuthContext) -> SessionResult<Page<Teacher>> {
    if demo_active(ctx) {
        ctx.engine().demo().teachers().await
    } else {
        ctx.api.get_teachers().await
    }
}

pub async fn fees(ctx: &AuthContext) -> SessionResult<Page<Fee>> {
    if demo_active(ctx) {
        ctx.engine().demo().fees().await
    } else {
        ctx.api.get_fees().await
    }
}

pub async fn announcements(ctx: &AuthContext) -> SessionResult<Page<Announcement>> {
    if demo_active(ctx) {
        ctx.engine().demo().announcements().await
    } else {
        ctx.api.get_announcements().await
    }
}
