mod api;
mod app;
mod config;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use api::auth::RegisterForm;
use api::client::ApiClient;
use api::exam_points::{ExamPointQuery, ExamPointUpdate};
use api::exam_papers::{ExamPaperQuery, ExamPaperUpdate};
use api::users::UserUpdate;
use app::commands;
use app::commands::papers::NewPaper;
use app::commands::points::NewPoint;

#[derive(Parser)]
#[command(version, about = "考点/试卷管理系统命令行客户端", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 登录、注册与会话管理
    #[command(subcommand)]
    Auth(AuthCmd),
    /// 用户管理（需管理员权限）
    #[command(subcommand)]
    Users(UsersCmd),
    /// 省份列表；带 --cities 时列出该省城市
    Provinces {
        /// 列出指定省份 ID 的城市
        #[arg(long)]
        cities: Option<i64>,
    },
    /// 考点管理
    #[command(subcommand)]
    Points(PointsCmd),
    /// 试卷管理
    #[command(subcommand)]
    Papers(PapersCmd),
}

#[derive(Subcommand)]
enum AuthCmd {
    /// 登录并保存令牌
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// 注册新用户
    Register(RegisterArgs),
    /// 查看当前登录用户
    Whoami,
    /// 退出登录并清除令牌
    Logout,
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(short, long)]
    username: String,
    #[arg(short, long)]
    email: String,
    #[arg(short, long)]
    password: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    real_name: Option<String>,
    #[arg(long)]
    age: Option<i32>,
    #[arg(long)]
    grade: Option<String>,
    #[arg(long)]
    province_id: Option<i64>,
    #[arg(long)]
    city_id: Option<i64>,
}

#[derive(Subcommand)]
enum UsersCmd {
    /// 用户列表
    List,
    /// 用户详情
    Show { id: i64 },
    /// 修改用户资料
    Update {
        id: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        real_name: Option<String>,
        #[arg(long)]
        age: Option<i32>,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        province_id: Option<i64>,
        #[arg(long)]
        city_id: Option<i64>,
        #[arg(long)]
        password: Option<String>,
    },
    /// 审核用户（--reject 为驳回）
    Approve {
        id: i64,
        #[arg(long)]
        reject: bool,
    },
    /// 切换激活/禁用状态
    Toggle { id: i64 },
    /// 删除用户（软删除）
    Delete { id: i64 },
}

#[derive(Args, Default)]
struct PointQueryArgs {
    #[arg(long)]
    province_id: Option<i64>,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    grade: Option<String>,
    #[arg(long)]
    semester: Option<String>,
    /// 一级考点（模糊匹配）
    #[arg(long)]
    level1: Option<String>,
    /// 二级考点（模糊匹配）
    #[arg(long)]
    level2: Option<String>,
    /// 三级考点（模糊匹配）
    #[arg(long)]
    level3: Option<String>,
    /// 描述关键字
    #[arg(long)]
    description: Option<String>,
}

impl From<PointQueryArgs> for ExamPointQuery {
    fn from(args: PointQueryArgs) -> Self {
        ExamPointQuery {
            province_id: args.province_id,
            subject: args.subject,
            grade: args.grade,
            semester: args.semester,
            level1_point: args.level1,
            level2_point: args.level2,
            level3_point: args.level3,
            description: args.description,
        }
    }
}

#[derive(Subcommand)]
enum PointsCmd {
    /// 按条件查询考点
    List(PointQueryArgs),
    /// 考点详情（描述按公式渲染）
    Show { id: i64 },
    /// 新建考点
    Create {
        #[arg(long)]
        province_id: i64,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        grade: String,
        #[arg(long)]
        semester: String,
        #[arg(long)]
        level1: String,
        #[arg(long)]
        level2: Option<String>,
        #[arg(long)]
        level3: Option<String>,
        #[arg(long)]
        description: String,
        #[arg(long)]
        coverage_rate: f64,
    },
    /// 修改考点
    Update {
        id: i64,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        semester: Option<String>,
        #[arg(long)]
        level1: Option<String>,
        #[arg(long)]
        level2: Option<String>,
        #[arg(long)]
        level3: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        coverage_rate: Option<f64>,
        #[arg(long)]
        is_active: Option<bool>,
    },
    /// 删除考点
    Delete { id: i64 },
    /// 批量导入（.json/.toml 文件或目录）
    Import { path: PathBuf },
    /// 按条件导出为 JSON 文件
    Export {
        #[command(flatten)]
        query: PointQueryArgs,
        /// 输出文件路径
        #[arg(long, default_value = "exam_points_export.json")]
        out: PathBuf,
    },
    /// 生成导入模板文件
    Template {
        #[arg(long, default_value = "exam_points_template.json")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum PapersCmd {
    /// 按条件查询试卷
    List {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        province_id: Option<i64>,
        #[arg(long)]
        subject: Option<String>,
        /// 试卷名称（模糊匹配）
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// 试卷预览（含已提取试题）
    Show { id: i64 },
    /// 新建试卷，--file 可附带本地试卷文件
    Create {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        province_id: i64,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        total_score: Option<i32>,
        /// 考试时长（分钟）
        #[arg(long)]
        exam_time: Option<i32>,
    },
    /// 单独上传试卷文件
    Upload { file: PathBuf },
    /// 修改试卷
    Update {
        id: i64,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        total_score: Option<i32>,
        #[arg(long)]
        exam_time: Option<i32>,
        #[arg(long)]
        is_active: Option<bool>,
    },
    /// 删除试卷
    Delete { id: i64 },
    /// 触发服务端试题提取
    Extract { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::get();
    let _guard = app::logger::init(&cfg.log_dir, "kaodian");

    let mut client = ApiClient::new(cfg);

    match cli.command {
        Commands::Auth(cmd) => match cmd {
            AuthCmd::Login { username, password } => {
                commands::auth::login(&mut client, &username, &password).await?;
            }
            AuthCmd::Register(args) => {
                let form = RegisterForm {
                    username: args.username,
                    email: args.email,
                    password: args.password,
                    phone: args.phone,
                    real_name: args.real_name,
                    age: args.age,
                    grade: args.grade,
                    province_id: args.province_id,
                    city_id: args.city_id,
                };
                commands::auth::register(&mut client, form).await?;
            }
            AuthCmd::Whoami => commands::auth::whoami(&mut client).await?,
            AuthCmd::Logout => commands::auth::logout(&mut client)?,
        },
        Commands::Users(cmd) => match cmd {
            UsersCmd::List => commands::users::list(&mut client).await?,
            UsersCmd::Show { id } => commands::users::show(&mut client, id).await?,
            UsersCmd::Update {
                id,
                username,
                email,
                phone,
                real_name,
                age,
                grade,
                province_id,
                city_id,
                password,
            } => {
                let update = UserUpdate {
                    username,
                    email,
                    phone,
                    real_name,
                    age,
                    grade,
                    province_id,
                    city_id,
                    password,
                };
                commands::users::update(&mut client, id, update).await?;
            }
            UsersCmd::Approve { id, reject } => {
                commands::users::approve(&mut client, id, !reject).await?;
            }
            UsersCmd::Toggle { id } => commands::users::toggle(&mut client, id).await?,
            UsersCmd::Delete { id } => commands::users::delete(&mut client, id).await?,
        },
        Commands::Provinces { cities } => match cities {
            Some(province_id) => commands::location::cities(&mut client, province_id).await?,
            None => commands::location::provinces(&mut client).await?,
        },
        Commands::Points(cmd) => match cmd {
            PointsCmd::List(query) => {
                commands::points::list(&mut client, &query.into()).await?;
            }
            PointsCmd::Show { id } => commands::points::show(&mut client, id).await?,
            PointsCmd::Create {
                province_id,
                subject,
                grade,
                semester,
                level1,
                level2,
                level3,
                description,
                coverage_rate,
            } => {
                let input = NewPoint {
                    province_id,
                    subject,
                    grade,
                    semester,
                    level1_point: level1,
                    level2_point: level2,
                    level3_point: level3,
                    description,
                    coverage_rate,
                };
                commands::points::create(&mut client, input).await?;
            }
            PointsCmd::Update {
                id,
                subject,
                grade,
                semester,
                level1,
                level2,
                level3,
                description,
                coverage_rate,
                is_active,
            } => {
                let update = ExamPointUpdate {
                    subject,
                    grade,
                    semester,
                    level1_point: level1,
                    level2_point: level2,
                    level3_point: level3,
                    description,
                    coverage_rate,
                    is_active,
                };
                commands::points::update(&mut client, id, update).await?;
            }
            PointsCmd::Delete { id } => commands::points::delete(&mut client, id).await?,
            PointsCmd::Import { path } => commands::points::import(&mut client, &path).await?,
            PointsCmd::Export { query, out } => {
                commands::points::export(&mut client, &query.into(), &out).await?;
            }
            PointsCmd::Template { out } => commands::points::template(&out)?,
        },
        Commands::Papers(cmd) => match cmd {
            PapersCmd::List {
                year,
                province_id,
                subject,
                name,
                skip,
                limit,
            } => {
                let query = ExamPaperQuery {
                    year,
                    province_id,
                    subject,
                    paper_name: name,
                    skip,
                    limit,
                };
                commands::papers::list(&mut client, &query).await?;
            }
            PapersCmd::Show { id } => commands::papers::show(&mut client, id).await?,
            PapersCmd::Create {
                year,
                province_id,
                subject,
                name,
                file,
                total_score,
                exam_time,
            } => {
                let input = NewPaper {
                    year,
                    province_id,
                    subject,
                    paper_name: name,
                    file,
                    total_score,
                    exam_time,
                };
                commands::papers::create(&mut client, input).await?;
            }
            PapersCmd::Upload { file } => commands::papers::upload(&mut client, &file).await?,
            PapersCmd::Update {
                id,
                year,
                subject,
                name,
                total_score,
                exam_time,
                is_active,
            } => {
                let update = ExamPaperUpdate {
                    year,
                    subject,
                    paper_name: name,
                    total_score,
                    exam_time,
                    is_active,
                };
                commands::papers::update(&mut client, id, update).await?;
            }
            PapersCmd::Delete { id } => commands::papers::delete(&mut client, id).await?,
            PapersCmd::Extract { id } => commands::papers::extract(&mut client, id).await?,
        },
    }

    Ok(())
}
