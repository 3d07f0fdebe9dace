use crate::models::{AppData, Theme};

pub fn render_index(data: &AppData) -> String {
    let theme = match data.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    INDEX_HTML
        .replace("{{POINTS}}", &data.points.to_string())
        .replace("{{STREAK}}", &data.streak.current.to_string())
        .replace("{{THEME}}", theme)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Study Tracker</title>
  <style>
    :root {
      --bg: #f6f4ef;
      --card: #ffffff;
      --ink: #25231f;
      --muted: #6b665e;
      --accent: #4f46e5;
      --done: #10b981;
      --open: #f59e0b;
      --late: #ef4444;
      --shadow: 0 16px 40px rgba(37, 35, 31, 0.12);
    }

    body.dark {
      --bg: #16161d;
      --card: #22222c;
      --ink: #f1f0ec;
      --muted: #a3a0a8;
      --shadow: 0 16px 40px rgba(0, 0, 0, 0.4);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      padding: 24px 16px 96px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: 1.8rem;
    }

    .badges {
      display: flex;
      gap: 10px;
      align-items: center;
    }

    .badge {
      background: var(--card);
      border-radius: 999px;
      padding: 8px 14px;
      box-shadow: var(--shadow);
      font-weight: 600;
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    nav {
      display: flex;
      gap: 8px;
      flex-wrap: wrap;
    }

    button {
      border: none;
      border-radius: 10px;
      padding: 8px 14px;
      font: inherit;
      cursor: pointer;
      background: var(--accent);
      color: #fff;
    }

    button.ghost {
      background: transparent;
      color: var(--ink);
      border: 1px solid var(--muted);
    }

    nav button.active {
      background: var(--ink);
      color: var(--bg);
    }

    .view {
      display: none;
    }

    .view.active {
      display: grid;
      gap: 16px;
    }

    .counts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .count-value {
      font-size: 2rem;
      font-weight: 700;
    }

    .muted {
      color: var(--muted);
    }

    form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 10px;
    }

    input, select, textarea {
      font: inherit;
      padding: 8px;
      border-radius: 8px;
      border: 1px solid var(--muted);
      background: var(--bg);
      color: var(--ink);
    }

    .task {
      display: flex;
      align-items: flex-start;
      gap: 12px;
      padding: 12px;
      border-left: 4px solid var(--open);
      border-radius: 10px;
      background: var(--bg);
      margin-bottom: 8px;
    }

    .task.completed {
      border-color: var(--done);
      opacity: 0.75;
    }

    .task.overdue {
      border-color: var(--late);
    }

    .task h3 {
      margin: 0 0 4px;
      font-size: 1rem;
    }

    .task .meta {
      font-size: 0.85rem;
      color: var(--muted);
      display: flex;
      gap: 10px;
    }

    .task .grow {
      flex: 1;
    }

    .calendar {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .day {
      min-height: 64px;
      padding: 6px;
      border-radius: 8px;
      background: var(--bg);
      cursor: pointer;
    }

    .day.today {
      outline: 2px solid var(--accent);
    }

    .day.past {
      opacity: 0.6;
    }

    .pill {
      display: inline-block;
      min-width: 20px;
      border-radius: 999px;
      padding: 0 6px;
      font-size: 0.75rem;
      color: #fff;
      text-align: center;
    }

    .pill.done {
      background: var(--done);
    }

    .pill.open {
      background: var(--open);
    }

    .bars {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 10px;
      align-items: end;
      height: 180px;
    }

    .bar {
      display: flex;
      flex-direction: column-reverse;
      align-items: stretch;
      height: 100%;
      text-align: center;
      font-size: 0.8rem;
    }

    .bar span {
      display: block;
    }

    .pie {
      width: 160px;
      height: 160px;
      border-radius: 50%;
    }

    .timer {
      font-size: 4rem;
      font-weight: 700;
      text-align: center;
    }

    .chat {
      position: fixed;
      right: 16px;
      bottom: 16px;
      width: min(360px, calc(100% - 32px));
    }

    .chat-log {
      max-height: 320px;
      overflow-y: auto;
      display: grid;
      gap: 8px;
      margin-bottom: 8px;
    }

    .msg {
      padding: 8px 10px;
      border-radius: 10px;
      background: var(--bg);
    }

    .msg.user {
      background: var(--accent);
      color: #fff;
      justify-self: end;
    }

    .msg time {
      display: block;
      font-size: 0.7rem;
      opacity: 0.7;
    }

    .status {
      min-height: 1.2em;
      font-size: 0.9rem;
    }

    .status.error {
      color: var(--late);
    }

    .status.ok {
      color: var(--done);
    }

    body.celebrating .app {
      animation: glow 1.5s ease 2;
    }

    @keyframes glow {
      50% {
        filter: drop-shadow(0 0 24px gold);
      }
    }
  </style>
</head>
<body class="{{THEME}}">
  <main class="app">
    <header>
      <h1>Study Tracker</h1>
      <div class="badges">
        <span class="badge">🔥 <span id="streak">{{STREAK}}</span>-day streak</span>
        <span class="badge">⭐ <span id="points">{{POINTS}}</span> pts</span>
        <button class="ghost" id="reset-points" type="button">Reset</button>
        <button class="ghost" id="theme-toggle" type="button">Theme</button>
      </div>
    </header>

    <nav>
      <button type="button" data-view="dashboard" class="active">Dashboard</button>
      <button type="button" data-view="tasks">Tasks</button>
      <button type="button" data-view="calendar">Calendar</button>
      <button type="button" data-view="stats">Stats</button>
      <button type="button" data-view="timer">Timer</button>
    </nav>

    <div class="status" id="status"></div>

    <section class="view active" id="view-dashboard">
      <div class="counts">
        <div class="card"><div class="muted">Due today</div><div class="count-value" id="today-count">0</div></div>
        <div class="card"><div class="muted">Completed this week</div><div class="count-value" id="week-count">0</div></div>
        <div class="card"><div class="muted">Overdue</div><div class="count-value" id="overdue-count">0</div></div>
      </div>
      <div class="card">
        <h2>Recent tasks</h2>
        <div id="recent-list"></div>
      </div>
    </section>

    <section class="view" id="view-tasks">
      <div class="card">
        <h2>Add task</h2>
        <form id="task-form">
          <input name="title" placeholder="Title" required />
          <input name="description" placeholder="Description" />
          <input name="deadlineDate" type="date" required />
          <input name="deadlineTime" type="time" value="23:59" required />
          <select name="category">
            <option value="general">General</option>
            <option value="study">Study</option>
            <option value="assignment">Assignment</option>
            <option value="exam">Exam</option>
            <option value="project">Project</option>
          </select>
          <select name="priority">
            <option value="low">Low</option>
            <option value="medium" selected>Medium</option>
            <option value="high">High</option>
          </select>
          <button type="submit">Add task</button>
        </form>
      </div>
      <div class="card">
        <nav id="filters">
          <button type="button" data-filter="all" class="active">All</button>
          <button type="button" data-filter="pending">Pending</button>
          <button type="button" data-filter="completed">Completed</button>
          <button type="button" data-filter="overdue">Overdue</button>
        </nav>
        <div id="task-list"></div>
      </div>
    </section>

    <section class="view" id="view-calendar">
      <div class="card">
        <nav>
          <button class="ghost" type="button" id="prev-month">‹</button>
          <h2 id="month-label"></h2>
          <button class="ghost" type="button" id="next-month">›</button>
        </nav>
        <div class="calendar" id="calendar"></div>
      </div>
      <div class="card">
        <h2 id="date-title">Select a day</h2>
        <div id="date-list"></div>
      </div>
    </section>

    <section class="view" id="view-stats">
      <div class="counts">
        <div class="card">
          <h2>This week</h2>
          <div class="pie" id="pie"></div>
          <p class="muted" id="pie-legend"></p>
        </div>
        <div class="card">
          <h2>Progress</h2>
          <div class="count-value" id="completion-rate">0%</div>
          <p class="muted" id="progress-detail"></p>
        </div>
      </div>
      <div class="card">
        <h2>Tasks by day</h2>
        <div class="bars" id="bars"></div>
      </div>
    </section>

    <section class="view" id="view-timer">
      <div class="card">
        <nav>
          <button class="ghost" type="button" data-minutes="25" data-mode="Focus Time">Focus 25</button>
          <button class="ghost" type="button" data-minutes="5" data-mode="Short Break">Break 5</button>
          <button class="ghost" type="button" data-minutes="15" data-mode="Long Break">Break 15</button>
        </nav>
        <p class="muted" id="timer-mode">Focus Time</p>
        <div class="timer" id="timer-display">25:00</div>
        <nav>
          <button type="button" id="timer-toggle">Start</button>
          <button class="ghost" type="button" id="timer-reset">Reset</button>
        </nav>
      </div>
    </section>
  </main>

  <aside class="chat card">
    <strong>Study Buddy</strong>
    <div class="chat-log" id="chat-log"></div>
    <form id="chat-form">
      <input name="message" placeholder="Say something..." autocomplete="off" />
    </form>
  </aside>

  <script>
    const statusEl = document.getElementById('status');
    let currentFilter = 'all';
    let calendarCursor = null;
    let selectedDate = null;

    const setStatus = (text, kind) => {
      statusEl.textContent = text;
      statusEl.className = `status ${kind}`;
    };

    const api = async (path, options = {}) => {
      const res = await fetch(path, {
        headers: { 'content-type': 'application/json' },
        ...options
      });
      if (res.status === 204) {
        return null;
      }
      if (!res.ok) {
        let message = 'Request failed';
        try {
          message = (await res.json()).message || message;
        } catch (_) {}
        throw new Error(message);
      }
      return res.json();
    };

    const el = (tag, className, text) => {
      const node = document.createElement(tag);
      if (className) {
        node.className = className;
      }
      if (text !== undefined) {
        node.textContent = text;
      }
      return node;
    };

    const formatDeadline = (iso) =>
      new Date(iso).toLocaleString('en-US', {
        month: 'short',
        day: 'numeric',
        hour: '2-digit',
        minute: '2-digit'
      });

    const taskCard = (task) => {
      const overdue = !task.completed && new Date(task.deadline) < new Date();
      const card = el('div', `task ${task.completed ? 'completed' : overdue ? 'overdue' : 'pending'}`);
      const box = el('input');
      box.type = 'checkbox';
      box.checked = task.completed;
      box.addEventListener('change', () => toggleTask(task, box));
      const body = el('div', 'grow');
      body.append(el('h3', '', task.title));
      if (task.description) {
        body.append(el('p', 'muted', task.description));
      }
      const meta = el('div', 'meta');
      meta.append(el('span', '', formatDeadline(task.deadline)));
      meta.append(el('span', '', task.priority));
      meta.append(el('span', '', task.category));
      body.append(meta);
      const remove = el('button', 'ghost', '✕');
      remove.type = 'button';
      remove.addEventListener('click', () => deleteTask(task));
      card.append(box, body, remove);
      return card;
    };

    const fillList = (container, tasks, empty) => {
      container.replaceChildren();
      if (tasks.length === 0) {
        container.append(el('p', 'muted', empty));
        return;
      }
      tasks.forEach((task) => container.append(taskCard(task)));
    };

    const loadDashboard = async () => {
      const dash = await api('/api/dashboard');
      document.getElementById('today-count').textContent = dash.todayCount;
      document.getElementById('week-count').textContent = dash.weekCompletedCount;
      document.getElementById('overdue-count').textContent = dash.overdueCount;
      document.getElementById('points').textContent = dash.points;
      document.getElementById('streak').textContent = dash.streak;
      fillList(document.getElementById('recent-list'), dash.recent, 'No tasks yet');
    };

    const loadTasks = async () => {
      const tasks = await api(`/api/tasks?filter=${currentFilter}`);
      fillList(document.getElementById('task-list'), tasks, 'No tasks found');
    };

    const loadCalendar = async () => {
      const query = calendarCursor ? `?year=${calendarCursor.year}&month=${calendarCursor.month}` : '';
      const month = await api(`/api/calendar${query}`);
      calendarCursor = { year: month.year, month: month.month };
      document.getElementById('month-label').textContent = month.label;
      const grid = document.getElementById('calendar');
      grid.replaceChildren();
      ['Sun', 'Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat'].forEach((name) => grid.append(el('strong', 'muted', name)));
      for (let i = 0; i < month.leadingBlanks; i += 1) {
        grid.append(el('div'));
      }
      month.days.forEach((day) => {
        const cell = el('div', `day${day.isToday ? ' today' : ''}${day.isPast ? ' past' : ''}`);
        cell.append(el('div', '', String(day.day)));
        if (day.completed > 0) {
          cell.append(el('span', 'pill done', String(day.completed)));
        }
        if (day.pending > 0) {
          cell.append(el('span', 'pill open', String(day.pending)));
        }
        cell.addEventListener('click', () => selectDate(day.date));
        grid.append(cell);
      });
      if (selectedDate) {
        await selectDate(selectedDate);
      }
    };

    const selectDate = async (date) => {
      selectedDate = date;
      const tasks = await api(`/api/tasks?date=${date}`);
      document.getElementById('date-title').textContent = `Tasks for ${date}`;
      fillList(document.getElementById('date-list'), tasks, 'No tasks for this date');
    };

    const loadStats = async () => {
      const stats = await api('/api/stats');
      const { completed, incomplete } = stats.weekly.pie;
      const total = completed + incomplete;
      const share = total > 0 ? (completed / total) * 360 : 0;
      document.getElementById('pie').style.background = total > 0
        ? `conic-gradient(var(--done) 0deg ${share}deg, var(--open) ${share}deg 360deg)`
        : 'var(--bg)';
      document.getElementById('pie-legend').textContent = `${completed} completed · ${incomplete} incomplete`;
      document.getElementById('completion-rate').textContent = `${stats.progress.completionRate}%`;
      document.getElementById('progress-detail').textContent =
        `${stats.progress.completed} completed · ${stats.progress.pending} pending`;

      const peak = Math.max(1, ...stats.weekly.days.map((day) => day.completed + day.pending));
      const bars = document.getElementById('bars');
      bars.replaceChildren();
      stats.weekly.days.forEach((day) => {
        const bar = el('div', 'bar');
        bar.append(el('span', '', day.label));
        const done = el('span', 'pill done', day.completed ? String(day.completed) : '');
        done.style.height = `${(day.completed / peak) * 140}px`;
        const open = el('span', 'pill open', day.pending ? String(day.pending) : '');
        open.style.height = `${(day.pending / peak) * 140}px`;
        bar.append(done, open);
        bars.append(bar);
      });
    };

    const loadChat = async () => {
      const chat = await api('/api/chat');
      const log = document.getElementById('chat-log');
      log.replaceChildren();
      chat.messages.forEach(appendMessage);
    };

    const appendMessage = (msg) => {
      const log = document.getElementById('chat-log');
      const node = el('div', `msg ${msg.sender}`, msg.text);
      const time = el('time', '', new Date(msg.time).toLocaleTimeString('en-US', { hour: '2-digit', minute: '2-digit' }));
      node.append(time);
      log.append(node);
      log.scrollTop = log.scrollHeight;
    };

    const refreshAll = async () => {
      await Promise.all([loadDashboard(), loadTasks(), loadCalendar(), loadStats()]);
    };

    const celebrate = () => {
      document.body.classList.add('celebrating');
      setStatus('🏆 200 points reached!', 'ok');
      setTimeout(() => document.body.classList.remove('celebrating'), 3000);
    };

    const toggleTask = async (task, box) => {
      const completed = box.checked;
      let confirmed = false;
      if (task.completed && !completed) {
        const points = task.pointsAwarded || 0;
        confirmed = confirm(
          `This task is already done. Undoing it will subtract its rewards (${points} points) from your total. Continue?`
        );
        if (!confirmed) {
          box.checked = true;
          return;
        }
      }
      try {
        const outcome = await api(`/api/tasks/${encodeURIComponent(task.id)}/completion`, {
          method: 'POST',
          body: JSON.stringify({ completed, confirmed })
        });
        if (outcome && outcome.changed && outcome.pointsEarned > 0) {
          setStatus(`+${outcome.pointsEarned} points`, 'ok');
        }
        if (outcome && outcome.message) {
          appendMessage({ text: outcome.message, sender: 'bot', time: new Date().toISOString() });
        }
        if (outcome && outcome.milestoneReached) {
          celebrate();
        }
      } catch (err) {
        setStatus(err.message, 'error');
      }
      await refreshAll();
    };

    const deleteTask = async (task) => {
      if (!confirm('Are you sure you want to delete this task?')) {
        return;
      }
      await api(`/api/tasks/${encodeURIComponent(task.id)}?confirm=true`, { method: 'DELETE' });
      await refreshAll();
    };

    document.querySelectorAll('nav [data-view]').forEach((button) => {
      button.addEventListener('click', () => {
        document.querySelectorAll('nav [data-view]').forEach((b) => b.classList.toggle('active', b === button));
        document.querySelectorAll('.view').forEach((view) => {
          view.classList.toggle('active', view.id === `view-${button.dataset.view}`);
        });
      });
    });

    document.querySelectorAll('#filters [data-filter]').forEach((button) => {
      button.addEventListener('click', () => {
        currentFilter = button.dataset.filter;
        document.querySelectorAll('#filters [data-filter]').forEach((b) => b.classList.toggle('active', b === button));
        loadTasks().catch((err) => setStatus(err.message, 'error'));
      });
    });

    const taskForm = document.getElementById('task-form');
    taskForm.deadlineDate.value = new Date().toISOString().split('T')[0];
    taskForm.addEventListener('submit', async (event) => {
      event.preventDefault();
      const body = Object.fromEntries(new FormData(taskForm).entries());
      try {
        await api('/api/tasks', { method: 'POST', body: JSON.stringify(body) });
        taskForm.reset();
        taskForm.deadlineDate.value = new Date().toISOString().split('T')[0];
        setStatus('Task added', 'ok');
        await refreshAll();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    const shiftMonth = (delta) => {
      if (!calendarCursor) {
        return;
      }
      const index = calendarCursor.year * 12 + (calendarCursor.month - 1) + delta;
      calendarCursor = { year: Math.floor(index / 12), month: (index % 12) + 1 };
      loadCalendar().catch((err) => setStatus(err.message, 'error'));
    };
    document.getElementById('prev-month').addEventListener('click', () => shiftMonth(-1));
    document.getElementById('next-month').addEventListener('click', () => shiftMonth(1));

    document.getElementById('theme-toggle').addEventListener('click', async () => {
      const { theme } = await api('/api/theme/toggle', { method: 'POST' });
      document.body.className = theme;
    });

    document.getElementById('reset-points').addEventListener('click', async () => {
      if (!confirm('Reset your points to zero? This cannot be undone.')) {
        return;
      }
      const { points } = await api('/api/points/reset', {
        method: 'POST',
        body: JSON.stringify({ confirmed: true })
      });
      document.getElementById('points').textContent = points;
    });

    const chatForm = document.getElementById('chat-form');
    const followUps = [];
    const clearFollowUps = () => {
      followUps.splice(0).forEach((handle) => clearTimeout(handle));
    };
    chatForm.addEventListener('submit', async (event) => {
      event.preventDefault();
      const message = chatForm.message.value.trim();
      if (!message) {
        return;
      }
      chatForm.message.value = '';
      clearFollowUps();
      try {
        const { messages } = await api('/api/chat', { method: 'POST', body: JSON.stringify({ message }) });
        messages.forEach((msg, index) => {
          followUps.push(setTimeout(() => appendMessage(msg), index * 700));
        });
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    // Timer: at most one interval exists at any time.
    const timer = { total: 25 * 60, left: 25 * 60, mode: 'Focus Time', handle: null };
    const timerDisplay = document.getElementById('timer-display');
    const timerToggle = document.getElementById('timer-toggle');

    const renderTimer = () => {
      const minutes = String(Math.floor(timer.left / 60)).padStart(2, '0');
      const seconds = String(timer.left % 60).padStart(2, '0');
      timerDisplay.textContent = `${minutes}:${seconds}`;
      document.getElementById('timer-mode').textContent = timer.mode;
      timerToggle.textContent = timer.handle ? 'Pause' : 'Start';
    };

    const stopTimer = () => {
      if (timer.handle) {
        clearInterval(timer.handle);
        timer.handle = null;
      }
    };

    const startTimer = () => {
      stopTimer();
      timer.handle = setInterval(() => {
        if (timer.left > 0) {
          timer.left -= 1;
        } else {
          stopTimer();
          if ('Notification' in window && Notification.permission === 'granted') {
            new Notification('Timer finished', { body: `${timer.mode} is over!` });
          } else {
            setStatus(`${timer.mode} is over!`, 'ok');
          }
        }
        renderTimer();
      }, 1000);
    };

    timerToggle.addEventListener('click', () => {
      if (timer.handle) {
        stopTimer();
      } else {
        startTimer();
      }
      renderTimer();
    });

    document.getElementById('timer-reset').addEventListener('click', () => {
      stopTimer();
      timer.left = timer.total;
      renderTimer();
    });

    document.querySelectorAll('[data-minutes]').forEach((button) => {
      button.addEventListener('click', () => {
        stopTimer();
        timer.total = Number(button.dataset.minutes) * 60;
        timer.left = timer.total;
        timer.mode = button.dataset.mode;
        renderTimer();
      });
    });

    const boot = async () => {
      const session = await api('/api/session', { method: 'POST' });
      document.body.className = session.theme;
      await Promise.all([refreshAll(), loadChat()]);
      renderTimer();
    };

    boot().catch((err) => setStatus(err.message, 'error'));
    setInterval(() => refreshAll().catch((err) => setStatus(err.message, 'error')), 60 * 60 * 1000);
  </script>
</body>
</html>
"##;
